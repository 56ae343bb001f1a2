//! Main workflow orchestration logic
//!
//! The thin pipeline over the real components: configuration, existence
//! checks, branch selection, version reconciliation, conversion, then
//! push-and-open. Kept free of clap so it can be called programmatically.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::category;
use crate::config::{self, CliOverrides, Config};
use crate::git::{GitCli, RemotePrompt, SkipRemote};
use crate::pandoc;
use crate::process::{SystemRunner, ToolRunner};
use crate::reconcile::{self, VersionReconciler};
use crate::ui;
use crate::workdir::WorkdirGuard;

/// Result of a completed build workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The reconciled version backing this build
    pub version: String,
    /// Where the produced document landed
    pub output: std::path::PathBuf,
    /// Whether commits and tags reached the remote
    pub pushed: bool,
    /// The branch the build ran on, unless branch handling was skipped
    pub branch: Option<String>,
}

/// Run one complete build:
/// configuration -> checks -> branch -> reconcile -> convert -> push-and-open.
pub fn run_build_workflow(
    overrides: CliOverrides,
    config_path: Option<&str>,
    open_result: bool,
) -> Result<WorkflowResult> {
    let defaults = config::load_defaults(config_path)
        .map_err(|e| anyhow::anyhow!("loading defaults: {}", e))?;
    let base_dir = env::current_dir()?;
    let config = Config::resolve(overrides, &defaults, base_dir)?;

    ui::display_parameters(&config);

    // Usage errors must surface before any repository state is touched
    let (policy, message) =
        reconcile::select_policy(config.message.as_deref(), config.level)?;

    // Everything from here runs relative to the project base directory; the
    // guard restores the shell's directory on every exit path.
    let _workdir = WorkdirGuard::change(&config.base_dir)?;

    let mut prompt: Box<dyn RemotePrompt> = if config.skip_remote_selection {
        Box::new(SkipRemote)
    } else {
        Box::new(ui::RemoteMenu)
    };
    let mut repo = GitCli::new(
        SystemRunner::new(),
        &config.project,
        config.remote_candidates.clone(),
    );
    repo.ensure_initialized(prompt.as_mut())?;

    let branch = select_and_checkout_branch(&config, &mut repo)?;
    match &branch {
        Some(name) => ui::display_status(&format!("git branch is {}", name)),
        None => ui::display_status("git branch is -skipped-"),
    }

    let reconciliation = VersionReconciler::new(&mut repo).reconcile(policy, &message)?;
    let version = reconciliation.version.to_string();

    let mut tools = SystemRunner::new();
    pandoc::convert(&mut tools, &config, Some(version.as_str()))?;

    // pandoc accepted the sources, so they are safe to share
    let pushed = repo.push(prompt.as_mut())?;

    ui::display_result(Some(version.as_str()), &config.target_path);
    if open_result {
        open_in_viewer(&mut tools, &config.target_path);
    }

    Ok(WorkflowResult {
        version,
        output: config.target_path.clone(),
        pushed,
        branch,
    })
}

/// Resolve the working branch and switch to it. Returns the branch name, or
/// `None` when branch handling was skipped.
fn select_and_checkout_branch(
    config: &Config,
    repo: &mut GitCli<SystemRunner>,
) -> Result<Option<String>> {
    let document = if config.source_is_mmd() {
        Some(
            fs::read_to_string(&config.source_path)
                .with_context(|| format!("reading {}", config.source_path.display()))?,
        )
    } else {
        None
    };

    let candidate = category::branch_candidate(
        &config.branch_choice,
        config.source_is_mmd(),
        document.as_deref(),
        &config.default_branch,
    );

    match candidate {
        None => Ok(None),
        Some(name) => {
            category::validate_branch_name(repo, &name)?;
            let current = repo.checkout(&name)?;
            Ok(Some(current))
        }
    }
}

/// Open the produced document in the platform viewer, best effort.
fn open_in_viewer<R: ToolRunner>(runner: &mut R, path: &Path) {
    let path_str = path.to_string_lossy();
    let (program, args): (&str, Vec<&str>) = if cfg!(target_os = "macos") {
        ("open", vec![path_str.as_ref()])
    } else if cfg!(target_os = "windows") {
        ("cmd", vec!["/C", "start", "", path_str.as_ref()])
    } else {
        ("xdg-open", vec![path_str.as_ref()])
    };

    match runner.run(program, &args) {
        Ok(result) if result.success() => {}
        Ok(result) => ui::display_status(&format!(
            "could not open '{}' (viewer exited with {})",
            path.display(),
            result.code
        )),
        Err(e) => ui::display_status(&format!("could not open '{}' ({})", path.display(), e)),
    }
}
