use crate::version::Version;
use std::fmt;

/// Warnings that occur when repository state does not advance as planned.
/// These are non-fatal issues that should be reported to the user; the build
/// proceeds on the last-known-good version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryWarning {
    /// Branch already up to date; version rolled back
    NothingToCommit { version: Version },
    /// Staging failed; nothing was committed and the version rolled back
    StagingFailed { version: Version, detail: String },
    /// Commit failed hard; version rolled back
    CommitFailed { version: Version, detail: String },
    /// Tag could not be applied for a reason other than "already exists"
    TagFailed { tag: String, detail: String },
    /// Remote not reachable; local commits and tags are retained
    PushUnreachable { detail: String },
    /// Remote could not be configured; repository stays local
    RemoteSetupFailed { detail: String },
    /// Pull before branching failed; branching from the local tip instead
    PullFailed { detail: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NothingToCommit { version } => {
                write!(f, "Branch is up to date, keeping version {}", version)
            }
            BoundaryWarning::StagingFailed { version, detail } => {
                write!(f, "Staging error ({}), keeping version {}", detail, version)
            }
            BoundaryWarning::CommitFailed { version, detail } => {
                write!(f, "Commit error ({}), keeping version {}", detail, version)
            }
            BoundaryWarning::TagFailed { tag, detail } => {
                write!(f, "Could not tag '{}': {}", tag, detail)
            }
            BoundaryWarning::PushUnreachable { detail } => {
                write!(f, "Push failed ({}). Not connected? Try next time", detail)
            }
            BoundaryWarning::RemoteSetupFailed { detail } => {
                write!(f, "Cannot configure remote ({}), keeping git local", detail)
            }
            BoundaryWarning::PullFailed { detail } => {
                write!(f, "Pull failed ({}), branching from the local tip", detail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_warnings_name_the_kept_version() {
        let warning = BoundaryWarning::NothingToCommit {
            version: Version::new(1, 2, 5),
        };
        assert!(warning.to_string().contains("v1.2-5"));
    }

    #[test]
    fn test_push_warning_suggests_retry() {
        let warning = BoundaryWarning::PushUnreachable {
            detail: "offline".to_string(),
        };
        assert!(warning.to_string().contains("Try next time"));
    }
}
