//! Pools command implementation
//!
//! Shows the scale, target triad and candidate pool size for every chord of
//! a progression, without running the sequencer.

use anyhow::{Context, Result};
use colored::Colorize;
use improvisor_melody::scale::Scale;
use improvisor_melody::sequencer::PreparedProgression;
use improvisor_spec::{validate_spec, BackendError, ImprovSpec};
use std::process::ExitCode;

use super::json_output::{
    input_error_to_json, print_json, validation_error_to_json, validation_warning_to_json,
    JsonError, PoolRecord, PoolsOutput,
};
use super::reporting;
use crate::input::{resolve_spec, SpecOverrides};

/// Run the pools command
///
/// # Arguments
/// * `spec_path` - Optional spec file supplying the progression and patterns
/// * `progression` - Progression string, used when no spec file is given
/// * `dedupe` - Drop duplicate cells from each pool
/// * `json_output` - Whether to output machine-readable JSON diagnostics
pub fn run(
    spec_path: Option<&str>,
    progression: Option<&str>,
    dedupe: bool,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(spec_path, progression, dedupe)
    } else {
        run_human(spec_path, progression, dedupe)
    }
}

/// Builds one record per parsed chord.
pub fn pool_records(spec: &ImprovSpec, dedupe: bool) -> Result<Vec<PoolRecord>, JsonError> {
    let parsed = spec.parsed_progression();
    let prepared = PreparedProgression::new(
        &parsed.chords,
        &spec.patterns,
        dedupe || spec.deduplicate_candidates,
    )
    .map_err(|e| JsonError::new(e.code(), e.to_string()))?;

    Ok(prepared
        .chords
        .iter()
        .zip(&prepared.targets)
        .zip(&prepared.pools)
        .enumerate()
        .map(|(index, ((chord, target), pool))| PoolRecord {
            index,
            chord: chord.to_string(),
            mode: chord.quality.mode_name().to_string(),
            scale: Scale::for_chord(chord)
                .pitches()
                .iter()
                .map(|p| p.to_string())
                .collect(),
            target: target.pitches().iter().map(|p| p.to_string()).collect(),
            pool_size: pool.len(),
        })
        .collect())
}

fn run_human(spec_path: Option<&str>, progression: Option<&str>, dedupe: bool) -> Result<ExitCode> {
    let loaded = resolve_spec(spec_path, progression, &SpecOverrides::default())
        .context("Failed to load spec")?;
    let spec = loaded.spec;

    println!("{} {}", "Expanding:".cyan().bold(), spec.progression);

    let validation = validate_spec(&spec);
    reporting::print_validation_messages(&validation.errors, &validation.warnings);
    if !validation.is_ok() {
        println!(
            "\n{} Spec has {} error(s)",
            "FAILED".red().bold(),
            validation.errors.len()
        );
        return Ok(ExitCode::from(1));
    }

    let records = match pool_records(&spec, dedupe) {
        Ok(records) => records,
        Err(e) => {
            println!("\n{} [{}] {}", "FAILED".red().bold(), e.code, e.message);
            return Ok(ExitCode::from(1));
        }
    };

    println!();
    for record in &records {
        println!(
            "{:>3}  {:<6} {:<10} target {:<14} pool {}",
            record.index,
            record.chord.bold(),
            record.mode,
            record.target.join(" "),
            record.pool_size
        );
        println!("     {} {}", "scale".dimmed(), record.scale.join(" ").dimmed());
    }

    let total: usize = records.iter().map(|r| r.pool_size).sum();
    println!(
        "\n{} {} chord(s), {} candidate cell(s)",
        "SUCCESS".green().bold(),
        records.len(),
        total
    );
    Ok(ExitCode::SUCCESS)
}

fn run_json(spec_path: Option<&str>, progression: Option<&str>, dedupe: bool) -> Result<ExitCode> {
    let spec = match resolve_spec(spec_path, progression, &SpecOverrides::default()) {
        Ok(loaded) => loaded.spec,
        Err(e) => {
            let error = input_error_to_json(&e, spec_path);
            print_json(&PoolsOutput::failure(vec![error], vec![]))?;
            return Ok(ExitCode::from(1));
        }
    };

    let validation = validate_spec(&spec);
    let warnings: Vec<_> = validation
        .warnings
        .iter()
        .map(validation_warning_to_json)
        .collect();
    if !validation.is_ok() {
        let errors = validation
            .errors
            .iter()
            .map(validation_error_to_json)
            .collect();
        print_json(&PoolsOutput::failure(errors, warnings))?;
        return Ok(ExitCode::from(1));
    }

    match pool_records(&spec, dedupe) {
        Ok(records) => {
            print_json(&PoolsOutput::success(records, warnings))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_json(&PoolsOutput::failure(vec![e], warnings))?;
            Ok(ExitCode::from(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_five_pool_records() {
        let spec = ImprovSpec::builder("pools-01", "Am,D7").build();
        let records = pool_records(&spec, false).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].chord, "Am");
        assert_eq!(records[0].mode, "dorian");
        assert_eq!(records[0].target, vec!["A4", "C5", "E5"]);
        assert_eq!(records[1].target, vec!["D4", "F#4", "A4"]);
        assert_eq!(records[0].pool_size, records[1].pool_size);
        assert_eq!(records[0].scale.len(), 8);
    }

    #[test]
    fn test_dedupe_never_grows_pools() {
        let spec = ImprovSpec::builder("pools-01", "Am,D7").build();
        let full = pool_records(&spec, false).unwrap();
        let deduped = pool_records(&spec, true).unwrap();
        for (a, b) in full.iter().zip(&deduped) {
            assert!(b.pool_size <= a.pool_size);
        }
    }

    #[test]
    fn test_unparseable_progression_fails() {
        let code = run(None, Some("Qz,Hx"), false, true).unwrap();
        assert_eq!(code, ExitCode::from(1));
    }
}
