//! Pure formatting functions for terminal output.
//!
//! All display logic lives here, separated from user interaction.

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Show what this build is going to process.
pub fn display_parameters(config: &Config) {
    println!("{}", style("**********************").dim());
    println!("{}", style("*").dim());
    println!("* Processing project <{}>:", style(&config.project).bold());
    println!("* base directory is    : {}", config.base_dir.display());
    println!("* source file is       : {}", config.source_path.display());
    println!("* target file is       : {}", config.target_path.display());
    println!("* template file is     : {}", config.template_path.display());
}

/// Show the reconciled version and where the result landed.
pub fn display_result(version: Option<&str>, target: &std::path::Path) {
    println!(
        "* version is           : {}",
        style(version.unwrap_or("-none-")).bold()
    );
    println!("* output written to    : {}", target.display());
    println!("{}", style("**********************").dim());
}
