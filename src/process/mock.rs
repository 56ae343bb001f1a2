use crate::error::{PublishError, Result};
use crate::process::{ToolResult, ToolRunner};
use std::collections::VecDeque;

/// Scripted runner for testing without external tools
///
/// Serves a FIFO queue of canned [ToolResult]s, one per invocation, and
/// records every invocation as a `"program arg arg"` line so tests can
/// assert on what would have been executed.
pub struct ScriptedRunner {
    script: VecDeque<ToolResult>,
    calls: Vec<String>,
}

impl ScriptedRunner {
    /// Create a new runner with an empty script
    pub fn new() -> Self {
        ScriptedRunner {
            script: VecDeque::new(),
            calls: Vec::new(),
        }
    }

    /// Queue the next canned result
    pub fn enqueue(&mut self, result: ToolResult) {
        self.script.push_back(result);
    }

    /// Queue a successful result carrying `stdout`
    pub fn enqueue_ok(&mut self, stdout: &str) {
        self.enqueue(ToolResult::ok(stdout));
    }

    /// Queue a failed result carrying `stderr`
    pub fn enqueue_err(&mut self, code: i32, stderr: &str) {
        self.enqueue(ToolResult::err(code, stderr));
    }

    /// Every invocation seen so far, oldest first
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// True if some recorded invocation contains `needle`
    pub fn saw(&self, needle: &str) -> bool {
        self.calls.iter().any(|c| c.contains(needle))
    }

    /// Number of queued results not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRunner for ScriptedRunner {
    fn run(&mut self, program: &str, args: &[&str]) -> Result<ToolResult> {
        let call = format!("{} {}", program, args.join(" "));
        self.calls.push(call.clone());
        self.script.pop_front().ok_or_else(|| {
            PublishError::unexpected(format!("no scripted result for: {}", call))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serves_results_in_order() {
        let mut runner = ScriptedRunner::new();
        runner.enqueue_ok("first");
        runner.enqueue_err(1, "second");

        let a = runner.run("git", &["status"]).unwrap();
        assert_eq!(a.stdout, "first");
        let b = runner.run("git", &["commit"]).unwrap();
        assert_eq!(b.code, 1);
    }

    #[test]
    fn test_records_calls() {
        let mut runner = ScriptedRunner::new();
        runner.enqueue_ok("");
        runner.run("git", &["add", "-u"]).unwrap();
        assert_eq!(runner.calls(), &["git add -u".to_string()]);
        assert!(runner.saw("add -u"));
    }

    #[test]
    fn test_exhausted_script_is_an_error() {
        let mut runner = ScriptedRunner::new();
        assert!(runner.run("git", &["status"]).is_err());
    }
}
