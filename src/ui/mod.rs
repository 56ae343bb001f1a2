//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure output functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use crate::git::RemotePrompt;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_parameters, display_result, display_status,
    display_success,
};

/// Interactive remote-server menu, run at most once per program run when a
/// push finds no remote configured.
///
/// Offers the configured candidate base URLs plus a custom entry; skipping
/// keeps the repository local.
pub struct RemoteMenu;

impl RemotePrompt for RemoteMenu {
    fn choose_remote_url(&mut self, candidates: &[String]) -> Option<String> {
        display_status("Consider configuring a remote server for this local git.");

        if !confirm_remote_setup().unwrap_or(false) {
            return None;
        }

        match select_remote_url(candidates) {
            Ok(url) => url,
            Err(_) => None,
        }
    }
}

/// Ask whether to configure a remote at all. Default is to skip.
fn confirm_remote_setup() -> io::Result<bool> {
    loop {
        print!(
            "Remote git server: already [c]reated your project remotely, \
             or [s]kip configuring a remote? [s]: "
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        match input.trim().to_lowercase().as_str() {
            "" | "s" => return Ok(false),
            "c" => return Ok(true),
            _ => display_status("Can only accept 'c', 's' or enter."),
        }
    }
}

/// Numbered menu over the candidate base URLs, with a custom entry last.
fn select_remote_url(candidates: &[String]) -> io::Result<Option<String>> {
    for (i, url) in candidates.iter().enumerate() {
        println!("  {}. {}", i + 1, url);
    }
    println!("  {}. .... other (specify)", candidates.len() + 1);

    loop {
        print!(
            "Enter your number of choice (1-{}), or <return> for none (keep git local): ",
            candidates.len() + 1
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let selection = input.trim();

        if selection.is_empty() {
            display_status("Applying local git only");
            return Ok(None);
        }

        match selection.parse::<usize>() {
            Ok(index) if index >= 1 && index <= candidates.len() => {
                let url = candidates[index - 1].clone();
                display_status(&format!("Applying git server: {}", url));
                return Ok(Some(url));
            }
            Ok(index) if index == candidates.len() + 1 => {
                if let Some(url) = read_custom_url()? {
                    return Ok(Some(url));
                }
                // Invalid custom URL: offer the menu again
            }
            _ => display_status("Can only accept a number, or a single enter."),
        }
    }
}

/// Read a fully qualified server URL; only http(s) schemes are accepted.
fn read_custom_url() -> io::Result<Option<String>> {
    print!("Enter the fully qualified url of the git server, including your account: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let url = input.trim();

    if url.starts_with("http://") || url.starts_with("https://") {
        display_status(&format!("Applying git server: {}", url));
        Ok(Some(url.to_string()))
    } else {
        display_status("Can only accept 'http' or 'https' schemas");
        Ok(None)
    }
}
