use crate::error::Result;
use crate::process::{ToolResult, ToolRunner};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Real runner over `std::process::Command`
///
/// Blocks until the child exits and captures both output streams. An
/// optional working directory pins all invocations to one base directory
/// regardless of the process-wide cwd.
pub struct SystemRunner {
    workdir: Option<PathBuf>,
}

impl SystemRunner {
    /// Run tools in the inherited working directory
    pub fn new() -> Self {
        SystemRunner { workdir: None }
    }

    /// Run every tool with `dir` as its working directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        SystemRunner {
            workdir: Some(dir.as_ref().to_path_buf()),
        }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[&str]) -> Result<ToolResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        let output = cmd.output()?;

        Ok(ToolResult {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
