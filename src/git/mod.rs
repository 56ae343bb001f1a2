//! Git operations abstraction layer
//!
//! This module wraps every interaction with the git executable. The split:
//!
//! - [classify]: named classifiers that turn git's text output into typed
//!   outcomes (the only place stdout/stderr is pattern-matched)
//! - [repository::GitCli]: the repository handle that issues the commands
//!   and owns the per-run caches (remote URL, branch map)
//!
//! Commands run through [crate::process::ToolRunner], so all of this is
//! exercisable in tests with a [crate::process::ScriptedRunner].

pub mod classify;
pub mod repository;

pub use repository::GitCli;

/// A local branch and whether HEAD currently points at it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub is_current: bool,
}

/// Branch map for one program run, parsed from `git branch` output.
///
/// Staleness across runs is fine; each run re-queries on first access.
#[derive(Debug, Clone, Default)]
pub struct Branches {
    entries: Vec<Branch>,
}

impl Branches {
    /// Parse `git branch` stdout (`* ` marks the current branch)
    pub fn parse(stdout: &str) -> Self {
        let mut entries = Vec::new();
        for line in stdout.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let is_current = line.starts_with('*');
            let name = line.trim_start_matches('*').trim();
            // Detached-HEAD placeholder, not a real branch
            if name.starts_with('(') {
                continue;
            }
            entries.push(Branch {
                name: name.to_string(),
                is_current,
            });
        }
        Branches { entries }
    }

    pub fn current(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|b| b.is_current)
            .map(|b| b.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|b| b.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|b| b.name.as_str())
    }

    /// Register a branch; `current` moves the current marker to it
    pub fn register(&mut self, name: &str, current: bool) {
        if !self.contains(name) {
            self.entries.push(Branch {
                name: name.to_string(),
                is_current: false,
            });
        }
        if current {
            self.set_current(name);
        }
    }

    pub fn set_current(&mut self, name: &str) {
        for b in &mut self.entries {
            b.is_current = b.name == name;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strategy for the one-time remote-repository setup.
///
/// Invoked synchronously when a push finds no remote configured. The
/// interactive implementation lives in [crate::ui]; [SkipRemote] keeps the
/// repository local and is what tests and non-interactive runs use.
pub trait RemotePrompt {
    /// Return the chosen remote base URL, or `None` to stay local
    fn choose_remote_url(&mut self, candidates: &[String]) -> Option<String>;
}

/// Never configures a remote
pub struct SkipRemote;

impl RemotePrompt for SkipRemote {
    fn choose_remote_url(&mut self, _candidates: &[String]) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branches_parse() {
        let branches = Branches::parse("  drafts\n* master\n  notes\n");
        assert_eq!(branches.len(), 3);
        assert_eq!(branches.current(), Some("master"));
        assert!(branches.contains("drafts"));
        assert!(!branches.contains("missing"));
    }

    #[test]
    fn test_branches_parse_skips_detached_head() {
        let branches = Branches::parse("* (HEAD detached at abc1234)\n  master\n");
        assert_eq!(branches.len(), 1);
        assert_eq!(branches.current(), None);
    }

    #[test]
    fn test_register_moves_current_marker() {
        let mut branches = Branches::parse("* master\n");
        branches.register("drafts", true);
        assert_eq!(branches.current(), Some("drafts"));
        assert!(branches.contains("master"));
    }

    #[test]
    fn test_skip_remote_declines() {
        let mut prompt = SkipRemote;
        assert_eq!(
            prompt.choose_remote_url(&["https://example.org/a".to_string()]),
            None
        );
    }
}
