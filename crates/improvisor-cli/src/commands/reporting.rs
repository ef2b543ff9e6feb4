//! Colored console output shared by the commands.

use colored::Colorize;
use improvisor_spec::{ValidationError, ValidationWarning};

/// Print validation errors and warnings to the console.
pub(super) fn print_validation_messages(errors: &[ValidationError], warnings: &[ValidationWarning]) {
    if !errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in errors {
            let path_info = error
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "x".red(),
                error.code.to_string().red(),
                path_info.dimmed(),
                error.message
            );
        }
    }

    print_warnings(warnings);
}

pub(super) fn print_warnings(warnings: &[ValidationWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!("\n{}", "Warnings:".yellow().bold());
    for warning in warnings {
        let path_info = warning
            .path
            .as_ref()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        println!(
            "  {} [{}]{}: {}",
            "!".yellow(),
            warning.code.to_string().yellow(),
            path_info.dimmed(),
            warning.message
        );
    }
}
