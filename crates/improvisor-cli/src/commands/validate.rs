//! Validate command implementation
//!
//! Checks an improv spec without generating anything.

use anyhow::{Context, Result};
use colored::Colorize;
use improvisor_spec::{canonical_spec_hash, validate_spec};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{
    input_error_to_json, print_json, validation_error_to_json, validation_warning_to_json,
    JsonError, JsonWarning, ValidateOutput,
};
use super::reporting;
use crate::input::{load_spec, LoadResult};

/// Run the validate command
///
/// # Arguments
/// * `spec_path` - Path to the spec file
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(spec_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(spec_path)
    } else {
        run_human(spec_path)
    }
}

fn run_human(spec_path: &str) -> Result<ExitCode> {
    let start = Instant::now();

    println!("{} {}", "Validating:".cyan().bold(), spec_path);

    let LoadResult {
        spec, source_hash, ..
    } = load_spec(Path::new(spec_path))
        .with_context(|| format!("Failed to load spec file: {}", spec_path))?;

    println!("{} {}", "Source hash:".dimmed(), &source_hash[..16]);

    let result = validate_spec(&spec);
    let duration_ms = start.elapsed().as_millis() as u64;

    reporting::print_validation_messages(&result.errors, &result.warnings);

    if result.is_ok() {
        let spec_hash = canonical_spec_hash(&spec).unwrap_or_else(|_| "unknown".to_string());
        println!("{} {}", "Spec hash:".dimmed(), spec_hash);
        println!(
            "\n{} Spec is valid ({}ms)",
            "SUCCESS".green().bold(),
            duration_ms
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} Spec has {} error(s) ({}ms)",
            "FAILED".red().bold(),
            result.errors.len(),
            duration_ms
        );
        Ok(ExitCode::from(1))
    }
}

fn run_json(spec_path: &str) -> Result<ExitCode> {
    let (spec, source_hash) = match load_spec(Path::new(spec_path)) {
        Ok(LoadResult {
            spec, source_hash, ..
        }) => (spec, source_hash),
        Err(e) => {
            let error = input_error_to_json(&e, Some(spec_path));
            print_json(&ValidateOutput::failure(vec![error], vec![], None, None))?;
            return Ok(ExitCode::from(1));
        }
    };

    let spec_hash = canonical_spec_hash(&spec).unwrap_or_else(|_| "unknown".to_string());
    let result = validate_spec(&spec);

    let warnings: Vec<JsonWarning> = result
        .warnings
        .iter()
        .map(validation_warning_to_json)
        .collect();

    let output = if result.is_ok() {
        ValidateOutput::success(spec_hash, source_hash, warnings)
    } else {
        let errors: Vec<JsonError> = result.errors.iter().map(validation_error_to_json).collect();
        ValidateOutput::failure(errors, warnings, Some(spec_hash), Some(source_hash))
    };

    print_json(&output)?;

    if output.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_valid_spec_exits_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("solo.json");
        fs::write(
            &path,
            r#"{"spec_version": 1, "id": "solo-01", "progression": "Am,D7", "description": "ii-V"}"#,
        )
        .unwrap();

        let code = run(path.to_str().unwrap(), true).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_invalid_spec_exits_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("solo.json");
        fs::write(
            &path,
            r#"{"spec_version": 1, "id": "solo-01", "progression": "Am,D7", "choruses": 0}"#,
        )
        .unwrap();

        let code = run(path.to_str().unwrap(), true).unwrap();
        assert_eq!(code, ExitCode::from(1));
    }

    #[test]
    fn test_missing_file_json_exits_one() {
        let code = run("/definitely/not/here.json", true).unwrap();
        assert_eq!(code, ExitCode::from(1));
    }

    #[test]
    fn test_missing_file_human_is_error() {
        assert!(run("/definitely/not/here.json", false).is_err());
    }
}
