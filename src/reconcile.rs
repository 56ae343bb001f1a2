//! Version-state reconciliation
//!
//! Produces the trustworthy version string for one document build. The
//! sequence is stage -> commit -> tag, and the computed version rolls back
//! to its previous value whenever the repository did not actually advance
//! (nothing to commit, staging error, hard commit failure). A version number
//! is never reported unless repository state durably reflects it.

use crate::boundary::BoundaryWarning;
use crate::error::{PublishError, Result};
use crate::git::classify::{CommitOutcome, TagOutcome};
use crate::git::GitCli;
use crate::process::ToolRunner;
use crate::ui;
use crate::version::{Version, VersionPolicy};

/// Message used when the user asked for no version bump and gave no message
pub const AUTO_MESSAGE: &str = "(auto message) Small textual changes only";

/// Result of one reconciliation cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The version backing this build: prospective on advance, previous on
    /// rollback
    pub version: Version,
    /// Whether repository state actually moved (commit created)
    pub advanced: bool,
}

/// One reconciliation attempt. Ephemeral: never outlives the cycle; the only
/// durable side effects are what git itself persists.
struct CommitAttempt {
    message: String,
    prospective: Version,
    previous: Version,
}

/// Derive the increment policy and commit message from the user's flags.
///
/// A message implies Minor unless an explicit level is given; no message and
/// no advancing level means Retain with an auto-generated message; an
/// advancing level without a message is a usage error.
pub fn select_policy(
    message: Option<&str>,
    level: Option<VersionPolicy>,
) -> Result<(VersionPolicy, String)> {
    match (message, level) {
        (Some(msg), Some(level)) => Ok((level, msg.to_string())),
        (Some(msg), None) => Ok((VersionPolicy::Minor, msg.to_string())),
        (None, None) | (None, Some(VersionPolicy::Retain)) => {
            Ok((VersionPolicy::Retain, AUTO_MESSAGE.to_string()))
        }
        (None, Some(_)) => Err(PublishError::config(
            "will not create a new version without a commit message; --level demands --git <msg>",
        )),
    }
}

/// Drives the stage -> commit -> tag cycle against a repository handle
pub struct VersionReconciler<'a, R: ToolRunner> {
    repo: &'a mut GitCli<R>,
}

impl<'a, R: ToolRunner> VersionReconciler<'a, R> {
    pub fn new(repo: &'a mut GitCli<R>) -> Self {
        VersionReconciler { repo }
    }

    /// Run one reconciliation cycle and return the version to build with.
    ///
    /// `previous` is captured before the attempt and is authoritative for
    /// rollback; state is never re-read after a failure. Failures here are
    /// recovered locally (warning + rollback) so the build can proceed on
    /// the last-known-good version; only version-scheme violations and spawn
    /// errors propagate.
    pub fn reconcile(&mut self, policy: VersionPolicy, message: &str) -> Result<Reconciliation> {
        let previous = self.repo.current_version()?;
        let attempt = CommitAttempt {
            message: message.to_string(),
            prospective: previous.apply(policy),
            previous,
        };

        if let Err(e) = self.repo.stage_all() {
            ui::display_boundary_warning(&BoundaryWarning::StagingFailed {
                version: attempt.previous,
                detail: e.to_string(),
            });
            return Ok(Reconciliation {
                version: attempt.previous,
                advanced: false,
            });
        }

        match self.repo.commit(&attempt.message)? {
            CommitOutcome::Created => {}
            CommitOutcome::NothingToCommit => {
                ui::display_boundary_warning(&BoundaryWarning::NothingToCommit {
                    version: attempt.previous,
                });
                return Ok(Reconciliation {
                    version: attempt.previous,
                    advanced: false,
                });
            }
            CommitOutcome::Failed { detail, .. } => {
                ui::display_boundary_warning(&BoundaryWarning::CommitFailed {
                    version: attempt.previous,
                    detail,
                });
                return Ok(Reconciliation {
                    version: attempt.previous,
                    advanced: false,
                });
            }
        }

        // Annotated tags mark version boundaries; a Retain commit advances
        // the commit count without a new tag.
        if policy.advances_tag() {
            match self.repo.tag(attempt.prospective)? {
                TagOutcome::Created | TagOutcome::AlreadyExists => {}
                TagOutcome::Failed { detail } => {
                    // The commit landed but the boundary tag did not;
                    // describe would still report the old version, so the
                    // prospective number is not durably backed.
                    ui::display_boundary_warning(&BoundaryWarning::TagFailed {
                        tag: attempt.prospective.tag_name(),
                        detail,
                    });
                    return Ok(Reconciliation {
                        version: attempt.previous,
                        advanced: false,
                    });
                }
            }
        }

        Ok(Reconciliation {
            version: attempt.prospective,
            advanced: true,
        })
    }
}
