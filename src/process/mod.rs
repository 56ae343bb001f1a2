//! External process abstraction layer
//!
//! Every external tool this program touches (git, pandoc, the platform file
//! opener) is invoked through the [ToolRunner] trait, which returns a
//! structured [ToolResult] instead of raising on non-zero exit. Outcome
//! classification happens in the callers by pattern-matching on that result.
//!
//! The concrete implementations are:
//!
//! - [runner::SystemRunner]: real implementation over `std::process::Command`
//! - [mock::ScriptedRunner]: canned results for testing
//!
//! Most code should depend on the [ToolRunner] trait rather than a concrete
//! implementation.

pub mod mock;
pub mod runner;

pub use mock::ScriptedRunner;
pub use runner::SystemRunner;

use crate::error::Result;

/// Captured outcome of one external tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    /// Process exit code; -1 when terminated without one (signal)
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolResult {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// A successful result carrying only stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        ToolResult {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed result carrying only stderr
    pub fn err(code: i32, stderr: impl Into<String>) -> Self {
        ToolResult {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// stdout with trailing whitespace removed
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim_end()
    }
}

/// Common external-invocation trait
///
/// Implementations run `program` with `args` to completion and capture the
/// exit status and both output streams. A spawn failure (program missing,
/// permissions) is an `Err`; an unhappy exit code is a normal [ToolResult]
/// for the caller to classify.
pub trait ToolRunner {
    fn run(&mut self, program: &str, args: &[&str]) -> Result<ToolResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_flag() {
        assert!(ToolResult::ok("fine").success());
        assert!(!ToolResult::err(1, "nope").success());
    }

    #[test]
    fn test_stdout_trimmed() {
        let result = ToolResult::ok("v1.2-5-gabc1234\n");
        assert_eq!(result.stdout_trimmed(), "v1.2-5-gabc1234");
    }
}
