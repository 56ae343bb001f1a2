// Integration tests against the real git binary, each inside a throwaway
// repository. Serial because git identity is provided through the process
// environment.

use std::fs;
use std::path::Path;
use std::process::Command;

use serial_test::serial;
use tempfile::TempDir;

use pandoc_publish::git::{GitCli, SkipRemote};
use pandoc_publish::process::SystemRunner;
use pandoc_publish::reconcile::{VersionReconciler, AUTO_MESSAGE};
use pandoc_publish::version::{Version, VersionPolicy};

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("could not run git");
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn ensure_identity() {
    std::env::set_var("GIT_AUTHOR_NAME", "Test Author");
    std::env::set_var("GIT_AUTHOR_EMAIL", "author@example.org");
    std::env::set_var("GIT_COMMITTER_NAME", "Test Author");
    std::env::set_var("GIT_COMMITTER_EMAIL", "author@example.org");
}

// Authored content matching the staged glob set
fn scaffold_content(dir: &Path) {
    for sub in [
        "thesis.scriv/Files/Docs",
        "thesis.scriv/Settings",
        "thesis.scriv/Snapshots",
        "src/docs",
        "templates",
    ] {
        fs::create_dir_all(dir.join(sub)).unwrap();
    }
    fs::write(dir.join("thesis.scriv/Files/Docs/chapter1.rtf"), "rtf").unwrap();
    fs::write(dir.join("thesis.scriv/Settings/ui.plist"), "ui").unwrap();
    fs::write(dir.join("thesis.scriv/Snapshots/snap.txt"), "snap").unwrap();
    fs::write(
        dir.join("src/docs/thesis.mmd"),
        "---\ncategory: drafts\n...\nBody text\n",
    )
    .unwrap();
    fs::write(dir.join("templates/pandoc-docstyle.docx"), "template").unwrap();
}

fn setup_project() -> TempDir {
    ensure_identity();
    let td = TempDir::new().expect("could not create temp dir");
    scaffold_content(td.path());
    td
}

fn handle(td: &TempDir) -> GitCli<SystemRunner> {
    GitCli::new(SystemRunner::in_dir(td.path()), "thesis", vec![])
}

#[test]
#[serial]
fn test_ensure_initialized_creates_repository_and_first_commit() {
    let td = setup_project();
    let mut repo = handle(&td);

    repo.ensure_initialized(&mut SkipRemote).unwrap();

    assert!(td.path().join(".git").exists());
    let count = git(td.path(), &["rev-list", "HEAD", "--count"]);
    assert_eq!(count.trim(), "1");

    // Idempotent: a second call is a no-op
    repo.ensure_initialized(&mut SkipRemote).unwrap();
    let count = git(td.path(), &["rev-list", "HEAD", "--count"]);
    assert_eq!(count.trim(), "1");
}

#[test]
#[serial]
fn test_current_version_introduces_versioning_scheme() {
    let td = setup_project();
    let mut repo = handle(&td);
    repo.ensure_initialized(&mut SkipRemote).unwrap();

    let version = repo.current_version().unwrap();
    assert_eq!(version, Version::new(0, 0, 1));

    let tags = git(td.path(), &["tag", "-l"]);
    assert!(tags.contains("v0.0"), "v0.0 tag missing, got: {}", tags);
}

#[test]
#[serial]
fn test_reconcile_minor_advances_and_tags() {
    let td = setup_project();
    let mut repo = handle(&td);
    repo.ensure_initialized(&mut SkipRemote).unwrap();

    fs::write(
        td.path().join("src/docs/thesis.mmd"),
        "---\ncategory: drafts\n...\nReworked body text\n",
    )
    .unwrap();

    let rec = VersionReconciler::new(&mut repo)
        .reconcile(VersionPolicy::Minor, "rework chapter 2")
        .unwrap();

    assert!(rec.advanced);
    assert_eq!(rec.version.to_string(), "v0.1-0");

    let describe = git(td.path(), &["describe", "--tags", "--long", "--always"]);
    assert!(
        describe.starts_with("v0.1-0-g"),
        "describe was: {}",
        describe
    );
}

#[test]
#[serial]
fn test_reconcile_clean_tree_rolls_back() {
    let td = setup_project();
    let mut repo = handle(&td);
    repo.ensure_initialized(&mut SkipRemote).unwrap();

    fs::write(td.path().join("src/docs/thesis.mmd"), "---\n...\nv2\n").unwrap();
    let first = VersionReconciler::new(&mut repo)
        .reconcile(VersionPolicy::Minor, "rework")
        .unwrap();
    assert_eq!(first.version.to_string(), "v0.1-0");

    // Nothing changed since: the auto-message cycle must not move the version
    let second = VersionReconciler::new(&mut repo)
        .reconcile(VersionPolicy::Retain, AUTO_MESSAGE)
        .unwrap();
    assert!(!second.advanced);
    assert_eq!(second.version, first.version);

    let describe = git(td.path(), &["describe", "--tags", "--long", "--always"]);
    assert!(describe.starts_with("v0.1-0-g"));
}

#[test]
#[serial]
fn test_checkout_creates_branch_from_master_and_is_idempotent() {
    let td = setup_project();
    let mut repo = handle(&td);
    repo.ensure_initialized(&mut SkipRemote).unwrap();
    // Branch naming varies across git versions; pin the expected parent
    git(td.path(), &["branch", "-M", "master"]);

    let current = repo.checkout("drafts").unwrap();
    assert_eq!(current, "drafts");

    let branches = git(td.path(), &["branch"]);
    assert!(branches.contains("* drafts"), "branches: {}", branches);
    assert!(branches.contains("master"));

    // Already current: no-op
    let again = repo.checkout("drafts").unwrap();
    assert_eq!(again, "drafts");
}

#[test]
#[serial]
fn test_branch_name_validation() {
    let td = setup_project();
    let mut repo = handle(&td);
    repo.ensure_initialized(&mut SkipRemote).unwrap();

    assert!(repo.is_valid_branch_name("literature_study").unwrap());
    assert!(!repo.is_valid_branch_name("bad name").unwrap());
    assert!(!repo.is_valid_branch_name("-leading-dash").unwrap());
}
