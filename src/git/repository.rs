use crate::boundary::BoundaryWarning;
use crate::error::{PublishError, Result};
use crate::git::classify::{
    self, CheckoutOutcome, CommitOutcome, DescribeOutcome, PushOutcome, TagOutcome,
};
use crate::git::{Branches, RemotePrompt};
use crate::process::{ToolResult, ToolRunner};
use crate::ui;
use crate::version::Version;

/// Repository handle: the only component that shells out to git.
///
/// Holds the per-run caches (remote URL, branch map) as explicit `Option`
/// fields populated by `refresh_*` methods. Other components request
/// operations and receive updated views; nothing else mutates the caches.
pub struct GitCli<R: ToolRunner> {
    runner: R,
    project: String,
    remote_candidates: Vec<String>,
    /// Outer `None` = not yet queried; inner `None` = no remote configured
    remote_url: Option<Option<String>>,
    branches: Option<Branches>,
    /// The interactive remote setup runs at most once per program run
    remote_prompted: bool,
}

impl<R: ToolRunner> GitCli<R> {
    pub fn new(runner: R, project: impl Into<String>, remote_candidates: Vec<String>) -> Self {
        GitCli {
            runner,
            project: project.into(),
            remote_candidates,
            remote_url: None,
            branches: None,
            remote_prompted: false,
        }
    }

    fn git(&mut self, args: &[&str]) -> Result<ToolResult> {
        self.runner.run("git", args)
    }

    /// Initialize the repository if none exists yet. Idempotent.
    ///
    /// A fresh repository gets an initial commit (so describe has something
    /// to work from) and a best-effort push, which triggers the one-time
    /// remote setup prompt.
    pub fn ensure_initialized(&mut self, prompt: &mut dyn RemotePrompt) -> Result<()> {
        let status = self.git(&["status"])?;
        if status.success() {
            return Ok(());
        }
        if !classify::is_not_a_repository(&status) {
            return Err(PublishError::unexpected(format!(
                "git status: {}",
                status.stderr.trim()
            )));
        }

        ui::display_status("Initializing local git repository ...");
        let init = self.git(&["init"])?;
        if !init.success() {
            return Err(PublishError::unexpected(format!(
                "git init failed: {}",
                init.stderr.trim()
            )));
        }

        // Best effort: a brand-new authoring directory may not have all of
        // the expected subdirectories yet.
        if let Err(e) = self.stage_all() {
            ui::display_boundary_warning(&BoundaryWarning::StagingFailed {
                version: Version::new(0, 0, 0),
                detail: e.to_string(),
            });
        }
        let commit = self.git(&[
            "commit",
            "--allow-empty",
            "-m",
            "Project initiated in git, first commit",
        ])?;
        if let CommitOutcome::Failed { detail, .. } = classify::commit_outcome(&commit) {
            return Err(PublishError::unexpected(format!(
                "initial commit failed: {}",
                detail
            )));
        }

        let _ = self.push(prompt)?;
        Ok(())
    }

    /// The configured remote URL, if any. Cached for the run.
    pub fn remote_url(&mut self) -> Result<Option<String>> {
        if let Some(cached) = &self.remote_url {
            return Ok(cached.clone());
        }
        let url = self.refresh_remote_url()?;
        self.remote_url = Some(url.clone());
        Ok(url)
    }

    fn refresh_remote_url(&mut self) -> Result<Option<String>> {
        let result = self.git(&["remote", "get-url", "origin"])?;
        if result.success() {
            return Ok(Some(result.stdout_trimmed().to_string()));
        }
        if classify::is_missing_remote(&result) {
            return Ok(None);
        }
        Err(PublishError::unexpected(format!(
            "git remote get-url: {}",
            result.stderr.trim()
        )))
    }

    /// Current version from describe output.
    ///
    /// With no reachable tag, versioning is introduced: Version(0,0,N) is
    /// synthesized from the total commit count and the `v0.0` tag created.
    /// A tag outside the `v<major>.<minor>` scheme is a dedicated error, not
    /// a guess.
    pub fn current_version(&mut self) -> Result<Version> {
        let result = self.git(&["describe", "--tags", "--long", "--always"])?;
        if !result.success() {
            return Err(PublishError::version(format!(
                "git describe failed: {}",
                result.stderr.trim()
            )));
        }

        match classify::describe_outcome(&result.stdout) {
            DescribeOutcome::Tagged(version, _hash) => Ok(version),
            DescribeOutcome::Untagged(_hash) => {
                let commits = self.rev_count()?;
                let version = Version::new(0, 0, commits);
                ui::display_status(&format!("Introducing versioning scheme ({})", version));
                match self.tag(version)? {
                    TagOutcome::Created | TagOutcome::AlreadyExists => {}
                    TagOutcome::Failed { detail } => {
                        ui::display_boundary_warning(&BoundaryWarning::TagFailed {
                            tag: version.tag_name(),
                            detail,
                        });
                    }
                }
                Ok(version)
            }
            DescribeOutcome::Unrecognized(text) => Err(PublishError::version(format!(
                "unrecognized version scheme in '{}'",
                text
            ))),
        }
    }

    fn rev_count(&mut self) -> Result<u32> {
        let result = self.git(&["rev-list", "HEAD", "--count"])?;
        if !result.success() {
            return Err(PublishError::version(format!(
                "git rev-list failed: {}",
                result.stderr.trim()
            )));
        }
        result.stdout_trimmed().parse::<u32>().map_err(|_| {
            PublishError::unexpected(format!(
                "rev-list count not a number: '{}'",
                result.stdout_trimmed()
            ))
        })
    }

    /// Stage the authored content: document sources, templates, settings and
    /// snapshots, plus all already-tracked modified files.
    ///
    /// Any failing glob aborts staging; the caller must not commit after a
    /// staging error.
    pub fn stage_all(&mut self) -> Result<()> {
        let scriv = |suffix: &str| format!("{}.scriv/{}", self.project, suffix);
        let globs = [
            scriv("Files/Docs/*.rtf"),
            scriv("Settings/*"),
            scriv("Snapshots/*"),
            "src/*".to_string(),
            "templates/*".to_string(),
        ];

        for glob in &globs {
            let result = self.git(&["add", glob])?;
            if !result.success() {
                return Err(PublishError::staging(format!(
                    "git add {}: {}",
                    glob,
                    result.stderr.trim()
                )));
            }
        }

        let tracked = self.git(&["add", "-u"])?;
        if !tracked.success() {
            return Err(PublishError::staging(format!(
                "git add -u: {}",
                tracked.stderr.trim()
            )));
        }
        Ok(())
    }

    /// Commit staged changes. The three-way outcome (created / nothing to
    /// commit / hard failure) is the caller's to act on.
    pub fn commit(&mut self, message: &str) -> Result<CommitOutcome> {
        let result = self.git(&["commit", "-m", message])?;
        Ok(classify::commit_outcome(&result))
    }

    /// Apply the annotated version-boundary tag for `version`.
    ///
    /// An existing tag of the same name is success; the caller is responsible
    /// for not re-deriving an already-used version when nothing advanced.
    pub fn tag(&mut self, version: Version) -> Result<TagOutcome> {
        let tag = version.tag_name();
        let message = format!("Version {}", tag);
        let result = self.git(&["tag", "-a", &tag, "-m", &message])?;
        Ok(classify::tag_outcome(&result))
    }

    /// Push commits and tags to the remote, best effort.
    ///
    /// With no remote configured, the injected prompt runs once per program
    /// run to set one up. Network or auth failure is logged and reported as
    /// `false`; local state is retained and pushed on a later run.
    pub fn push(&mut self, prompt: &mut dyn RemotePrompt) -> Result<bool> {
        if self.remote_url()?.is_none() && !self.establish_remote(prompt)? {
            return Ok(false);
        }

        if let Some(url) = self.remote_url()? {
            ui::display_status(&format!("Pushing commits and tags to {}", url));
            let result = self.git(&["push", "--follow-tags"])?;
            match classify::push_outcome(&result) {
                PushOutcome::Pushed => return Ok(true),
                PushOutcome::NoUpstream { branch } => {
                    let branch = match branch {
                        Some(b) => b,
                        None => self.current_branch()?,
                    };
                    let retry = self.git(&["push", "--set-upstream", "origin", &branch])?;
                    if retry.success() {
                        return Ok(true);
                    }
                    ui::display_boundary_warning(&BoundaryWarning::PushUnreachable {
                        detail: retry.stderr.trim().to_string(),
                    });
                }
                PushOutcome::Unreachable { detail } => {
                    ui::display_boundary_warning(&BoundaryWarning::PushUnreachable { detail });
                }
            }
        }
        Ok(false)
    }

    /// Run the remote-setup prompt (at most once per run) and register the
    /// chosen URL. Returns true when a remote is configured afterwards.
    fn establish_remote(&mut self, prompt: &mut dyn RemotePrompt) -> Result<bool> {
        if self.remote_prompted {
            return Ok(false);
        }
        self.remote_prompted = true;

        let candidates = self.remote_candidates.clone();
        let base = match prompt.choose_remote_url(&candidates) {
            Some(base) => base,
            None => {
                ui::display_status("Keeping git local (no remote configured)");
                return Ok(false);
            }
        };
        let url = format!("{}/{}", base.trim_end_matches('/'), self.project);

        let added = self.git(&["remote", "add", "origin", &url])?;
        if !added.success() {
            ui::display_boundary_warning(&BoundaryWarning::RemoteSetupFailed {
                detail: added.stderr.trim().to_string(),
            });
            self.remote_url = Some(None);
            return Ok(false);
        }

        let branch = self.current_branch()?;
        let upstream = self.git(&["push", "--set-upstream", "origin", &branch])?;
        if !upstream.success() {
            ui::display_boundary_warning(&BoundaryWarning::RemoteSetupFailed {
                detail: upstream.stderr.trim().to_string(),
            });
            self.remote_url = Some(None);
            return Ok(false);
        }

        self.remote_url = Some(Some(url));
        Ok(true)
    }

    /// The branch map, populated on first call and cached for the run
    pub fn branches(&mut self) -> Result<&Branches> {
        self.ensure_branches()?;
        match &self.branches {
            Some(branches) => Ok(branches),
            // ensure_branches just populated the cache
            None => Err(PublishError::unexpected("branch cache not populated")),
        }
    }

    fn ensure_branches(&mut self) -> Result<()> {
        if self.branches.is_none() {
            let result = self.git(&["branch"])?;
            if !result.success() {
                return Err(PublishError::unexpected(format!(
                    "git branch: {}",
                    result.stderr.trim()
                )));
            }
            self.branches = Some(Branches::parse(&result.stdout));
        }
        Ok(())
    }

    /// Name of the branch HEAD points at, falling back to "master" when
    /// detached
    pub fn current_branch(&mut self) -> Result<String> {
        Ok(self
            .branches()?
            .current()
            .unwrap_or("master")
            .to_string())
    }

    /// Switch to `branch`, in a safe way. Creates the branch off the latest
    /// master if it does not exist yet. Returns the current branch name.
    ///
    /// Leaving a branch first commits the work on it (auto message); the
    /// checkout does not proceed if that commit hard-fails.
    pub fn checkout(&mut self, branch: &str) -> Result<String> {
        let current = self.current_branch()?;
        if current == branch {
            return Ok(current);
        }

        let message = format!(
            "saving work from branch {} before checking out {}",
            current, branch
        );
        self.stage_all()?;
        if let CommitOutcome::Failed { detail, .. } = self.commit(&message)? {
            return Err(PublishError::branch(format!(
                "commit on '{}' before checkout failed: {}",
                current, detail
            )));
        }

        let exists = self.branches()?.contains(branch);
        if exists {
            return self.checkout_existing(branch);
        }
        self.create_branch(branch, &current)
    }

    fn checkout_existing(&mut self, branch: &str) -> Result<String> {
        let result = self.git(&["checkout", branch])?;
        match classify::checkout_outcome(&result) {
            CheckoutOutcome::Switched(name) | CheckoutOutcome::AlreadyOn(name) => {
                if let Some(branches) = &mut self.branches {
                    branches.set_current(&name);
                }
                Ok(name)
            }
            CheckoutOutcome::Unexpected(text) => Err(PublishError::unexpected(format!(
                "checkout of '{}' returned: {}",
                branch, text
            ))),
        }
    }

    /// Branch from the latest master state, register the new branch and push
    /// its upstream tracking reference (best effort).
    fn create_branch(&mut self, branch: &str, current: &str) -> Result<String> {
        if current != "master" {
            let onto_master = self.git(&["checkout", "master"])?;
            match classify::checkout_outcome(&onto_master) {
                CheckoutOutcome::Switched(_) | CheckoutOutcome::AlreadyOn(_) => {
                    if let Some(branches) = &mut self.branches {
                        branches.set_current("master");
                    }
                }
                CheckoutOutcome::Unexpected(text) => {
                    return Err(PublishError::unexpected(format!(
                        "checkout of 'master' returned: {}",
                        text
                    )));
                }
            }
            let pull = self.git(&["pull"])?;
            if !pull.success() {
                ui::display_boundary_warning(&BoundaryWarning::PullFailed {
                    detail: pull.stderr.trim().to_string(),
                });
            }
        }

        let created = self.git(&["checkout", "-b", branch])?;
        match classify::checkout_outcome(&created) {
            CheckoutOutcome::Switched(name) => {
                if let Some(branches) = &mut self.branches {
                    branches.register(&name, true);
                }
                let upstream = self.git(&["push", "--set-upstream", "origin", &name])?;
                if !upstream.success() {
                    ui::display_boundary_warning(&BoundaryWarning::PushUnreachable {
                        detail: upstream.stderr.trim().to_string(),
                    });
                }
                Ok(name)
            }
            CheckoutOutcome::AlreadyOn(_) | CheckoutOutcome::Unexpected(_) => {
                Err(PublishError::branch(format!(
                    "could not create branch '{}': {}",
                    branch,
                    format!("{}\n{}", created.stdout, created.stderr).trim()
                )))
            }
        }
    }

    /// Validate a candidate branch name with git itself
    pub fn is_valid_branch_name(&mut self, name: &str) -> Result<bool> {
        let result = self.git(&["check-ref-format", "--branch", name])?;
        Ok(result.success())
    }
}
