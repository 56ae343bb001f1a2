//! Outcome classification for git's text output
//!
//! All semantic interpretation of git stdout/stderr happens here, in small
//! named classifiers over [ToolResult]. Each classifier recognizes an exact
//! grammar; anything outside it is reported as such instead of guessed at.

use crate::process::ToolResult;
use crate::version::Version;
use regex::Regex;

/// Outcome of `git commit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new commit was created; repository state advanced
    Created,
    /// Nothing staged or branch already up to date; not an error, but no
    /// state advance
    NothingToCommit,
    /// Hard failure (permissions, disk, hooks)
    Failed { code: i32, detail: String },
}

/// Outcome of `git tag -a`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    Created,
    /// The tag name is taken; treated as success by callers that avoided
    /// re-deriving an already-used version
    AlreadyExists,
    Failed { detail: String },
}

/// Outcome of `git checkout [-b]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Switched(String),
    AlreadyOn(String),
    /// Response outside the known grammar; a violated assumption, not an
    /// operational error
    Unexpected(String),
}

/// Outcome of `git push`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    /// The current branch has no upstream tracking reference yet
    NoUpstream { branch: Option<String> },
    /// Remote not reachable (offline, auth); retried on a later run
    Unreachable { detail: String },
}

/// Outcome of `git describe --tags --long --always`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescribeOutcome {
    /// Canonical `v<major>.<minor>-<commits>-g<hash>` grammar
    Tagged(Version, String),
    /// Bare-hash fallback from `--always`: no tag reachable
    Untagged(String),
    /// Some tag exists but not in our versioning scheme
    Unrecognized(String),
}

/// Classify a `git commit` result
pub fn commit_outcome(result: &ToolResult) -> CommitOutcome {
    if result.success() {
        return CommitOutcome::Created;
    }

    let text = format!("{}\n{}", result.stdout, result.stderr).to_lowercase();
    let benign = [
        "nothing to commit",
        "nothing added to commit",
        "no changes added to commit",
        "up to date",
        "up-to-date",
    ];
    if benign.iter().any(|p| text.contains(p)) {
        return CommitOutcome::NothingToCommit;
    }

    CommitOutcome::Failed {
        code: result.code,
        detail: result.stderr.trim().to_string(),
    }
}

/// Classify a `git tag -a <name>` result
pub fn tag_outcome(result: &ToolResult) -> TagOutcome {
    if result.success() {
        return TagOutcome::Created;
    }

    if result.stderr.contains("already exists") {
        return TagOutcome::AlreadyExists;
    }

    TagOutcome::Failed {
        detail: result.stderr.trim().to_string(),
    }
}

/// Classify a `git checkout` result
///
/// git reports branch switches on stderr, so both streams are scanned.
pub fn checkout_outcome(result: &ToolResult) -> CheckoutOutcome {
    let text = format!("{}\n{}", result.stdout, result.stderr);

    if result.success() {
        if let Some(re) = Regex::new(r"Switched to (?:a new )?branch '([^']+)'").ok() {
            if let Some(captures) = re.captures(&text) {
                return CheckoutOutcome::Switched(captures[1].to_string());
            }
        }
        if let Some(re) = Regex::new(r"Already on '([^']+)'").ok() {
            if let Some(captures) = re.captures(&text) {
                return CheckoutOutcome::AlreadyOn(captures[1].to_string());
            }
        }
    }

    CheckoutOutcome::Unexpected(text.trim().to_string())
}

/// Classify a `git push` result
pub fn push_outcome(result: &ToolResult) -> PushOutcome {
    if result.success() {
        return PushOutcome::Pushed;
    }

    if result.stderr.contains("has no upstream branch") {
        let branch = Regex::new(r"The current branch '?([^' ]+)'? has no upstream")
            .ok()
            .and_then(|re| re.captures(&result.stderr))
            .map(|c| c[1].to_string());
        return PushOutcome::NoUpstream { branch };
    }

    PushOutcome::Unreachable {
        detail: result.stderr.trim().to_string(),
    }
}

/// Classify `git describe --tags --long --always` stdout
///
/// Recognizes exactly the canonical grammar or the bare-hash fallback.
/// Everything else is [DescribeOutcome::Unrecognized]: the repository is
/// tagged under some other scheme and guessing would corrupt the history.
pub fn describe_outcome(stdout: &str) -> DescribeOutcome {
    let text = stdout.trim();

    if let Some(re) = Regex::new(r"^v(\d+)\.(\d+)-(\d+)-g([0-9a-f]+)$").ok() {
        if let Some(captures) = re.captures(text) {
            // The digit groups can only fail to parse on overflow
            let parse = |i: usize| captures[i].parse::<u32>().ok();
            if let (Some(major), Some(minor), Some(commits)) = (parse(1), parse(2), parse(3)) {
                return DescribeOutcome::Tagged(
                    Version::new(major, minor, commits),
                    captures[4].to_string(),
                );
            }
        }
    }

    if let Some(re) = Regex::new(r"^[0-9a-f]{4,40}$").ok() {
        if re.is_match(text) {
            return DescribeOutcome::Untagged(text.to_string());
        }
    }

    DescribeOutcome::Unrecognized(text.to_string())
}

/// True when a failed invocation means "no repository here"
pub fn is_not_a_repository(result: &ToolResult) -> bool {
    !result.success()
        && result
            .stderr
            .to_lowercase()
            .contains("not a git repository")
}

/// True when a failed `git remote get-url` means the remote is simply absent
pub fn is_missing_remote(result: &ToolResult) -> bool {
    !result.success()
        && (result.stderr.contains("No such remote")
            || result.stderr.to_lowercase().contains("not a git repository"))
}
