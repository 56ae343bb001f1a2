//! Branch selection from the document's metadata block
//!
//! MultiMarkdown sources exported from the writing tool may open with a
//! metadata block whose `category:` entry names the branch the document
//! belongs on. The block starts with a line whose first three characters are
//! `---` and ends at a line containing `...`.

use crate::error::{PublishError, Result};
use crate::git::GitCli;
use crate::process::ToolRunner;
use regex::Regex;

/// Where the working branch for a build comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchChoice {
    /// `--checkout 0`: leave the current branch alone
    Skip,
    /// Explicit `--checkout <name>` override
    Named(String),
    /// No override: consult the document's metadata block
    FromDocument,
}

impl BranchChoice {
    /// Interpret the raw `--checkout` argument
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => BranchChoice::FromDocument,
            Some("0") => BranchChoice::Skip,
            Some(name) => BranchChoice::Named(name.to_string()),
        }
    }
}

/// Extract the category value from a document's metadata block.
///
/// Returns `None` when the document has no metadata block, the block ends
/// before a `category:` line, or the file is exhausted first.
pub fn category_from_document(text: &str) -> Option<String> {
    let mut lines = text.lines();

    let first = lines.next()?;
    if !first.starts_with("---") {
        return None;
    }

    for line in lines {
        if line.contains("...") {
            return None;
        }
        if let Some((key, value)) = line.split_once(':') {
            if key.trim().eq_ignore_ascii_case("category") {
                let normalized = normalize_category(value);
                if normalized.is_empty() {
                    return None;
                }
                return Some(normalized);
            }
        }
    }
    None
}

/// Normalize a category value into a branch-name candidate: surrounding
/// quotes stripped, whitespace runs collapsed to single underscores.
pub fn normalize_category(value: &str) -> String {
    let trimmed = value.trim().trim_matches(|c| c == '\'' || c == '"').trim();
    match Regex::new(r"\s+") {
        Ok(re) => re.replace_all(trimmed, "_").to_string(),
        Err(_) => trimmed.split_whitespace().collect::<Vec<_>>().join("_"),
    }
}

/// Resolve the branch-name candidate for this build.
///
/// The explicit override wins; otherwise `.mmd` sources are scanned for a
/// category entry; everything falls back to the configured default branch.
pub fn branch_candidate(
    choice: &BranchChoice,
    source_is_mmd: bool,
    document: Option<&str>,
    default_branch: &str,
) -> Option<String> {
    match choice {
        BranchChoice::Skip => None,
        BranchChoice::Named(name) => Some(name.clone()),
        BranchChoice::FromDocument => {
            let from_block = if source_is_mmd {
                document.and_then(category_from_document)
            } else {
                None
            };
            Some(from_block.unwrap_or_else(|| default_branch.to_string()))
        }
    }
}

/// Validate a candidate with git before using it.
///
/// An illegal branch name is a hard error: proceeding would corrupt
/// repository state.
pub fn validate_branch_name<R: ToolRunner>(repo: &mut GitCli<R>, name: &str) -> Result<()> {
    if repo.is_valid_branch_name(name)? {
        Ok(())
    } else {
        Err(PublishError::branch(format!(
            "'{}' is not a legal branch name",
            name
        )))
    }
}
