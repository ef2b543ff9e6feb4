//! Generate command implementation
//!
//! Generates a solo from a spec file or a progression string and writes it
//! as a Standard MIDI File.

use anyhow::{Context, Result};
use colored::Colorize;
use improvisor_melody::generate::{generate_melody, GenerateError, GenerateResult};
use improvisor_melody::listing::render_listing;
use improvisor_spec::BackendError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{
    composition_to_json, error_codes, input_error_to_json, print_json, validation_error_to_json,
    validation_warning_to_json, GenerateOutput, GenerateRecord, JsonError,
};
use super::reporting;
use crate::input::{resolve_spec, LoadResult, SpecOverrides};

/// Arguments for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs<'a> {
    pub spec_path: Option<&'a str>,
    pub progression: Option<&'a str>,
    pub overrides: SpecOverrides,
    /// Output path (default: `{id}.mid` in the current directory)
    pub out: Option<&'a str>,
    /// Print the cell listing after generation
    pub listing: bool,
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 on success, 1 on failure
pub fn run(args: &GenerateArgs<'_>, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(args)
    } else {
        run_human(args)
    }
}

/// Output path for a spec id.
pub fn output_path(out: Option<&str>, spec_id: &str) -> PathBuf {
    match out {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(format!("{}.mid", spec_id)),
    }
}

fn write_output(path: &Path, result: &GenerateResult) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, &result.midi)
}

fn run_human(args: &GenerateArgs<'_>) -> Result<ExitCode> {
    let start = Instant::now();

    let LoadResult { spec, source, .. } =
        resolve_spec(args.spec_path, args.progression, &args.overrides)
            .context("Failed to load spec")?;

    println!("{} {}", "Generating:".cyan().bold(), source);
    println!(
        "{} {} (seed {}, {} chorus(es))",
        "Spec:".dimmed(),
        spec.id,
        spec.seed,
        spec.choruses
    );

    let result = match generate_melody(&spec) {
        Ok(result) => result,
        Err(GenerateError::InvalidSpec(errors)) => {
            reporting::print_validation_messages(&errors, &[]);
            println!(
                "\n{} Spec has {} error(s)",
                "FAILED".red().bold(),
                errors.len()
            );
            return Ok(ExitCode::from(1));
        }
        Err(e) => {
            println!("\n{} [{}] {}", "FAILED".red().bold(), e.code(), e);
            return Ok(ExitCode::from(1));
        }
    };

    reporting::print_warnings(&result.warnings);

    let path = output_path(args.out, &spec.id);
    write_output(&path, &result)
        .with_context(|| format!("Failed to write MIDI file: {}", path.display()))?;

    if args.listing {
        println!();
        print!("{}", render_listing(&result.composition));
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    let repeats = result
        .composition
        .cells()
        .iter()
        .filter(|c| c.route == improvisor_melody::Route::Repeat)
        .count();

    println!(
        "\n{} {} chords, {} cells, {} notes ({} repeated)",
        "Composed:".dimmed(),
        result.chords.len(),
        result.composition.len(),
        result.composition.note_count(),
        repeats
    );
    println!("{} {}", "Output:".dimmed(), path.display());
    println!("{} {}", "Hash:".dimmed(), result.hash);
    println!(
        "\n{} Generated solo ({}ms)",
        "SUCCESS".green().bold(),
        duration_ms
    );
    Ok(ExitCode::SUCCESS)
}

fn run_json(args: &GenerateArgs<'_>) -> Result<ExitCode> {
    let start = Instant::now();

    let spec = match resolve_spec(args.spec_path, args.progression, &args.overrides) {
        Ok(LoadResult { spec, .. }) => spec,
        Err(e) => {
            let error = input_error_to_json(&e, args.spec_path);
            print_json(&GenerateOutput::failure(vec![error], vec![]))?;
            return Ok(ExitCode::from(1));
        }
    };

    let result = match generate_melody(&spec) {
        Ok(result) => result,
        Err(GenerateError::InvalidSpec(errors)) => {
            let errors = errors.iter().map(validation_error_to_json).collect();
            print_json(&GenerateOutput::failure(errors, vec![]))?;
            return Ok(ExitCode::from(1));
        }
        Err(e) => {
            let error = JsonError::new(e.code(), e.to_string());
            print_json(&GenerateOutput::failure(vec![error], vec![]))?;
            return Ok(ExitCode::from(1));
        }
    };

    let warnings: Vec<_> = result
        .warnings
        .iter()
        .map(validation_warning_to_json)
        .collect();

    let path = output_path(args.out, &spec.id);
    if let Err(e) = write_output(&path, &result) {
        let error = JsonError::new(error_codes::FILE_WRITE, e.to_string())
            .with_file(path.display().to_string());
        print_json(&GenerateOutput::failure(vec![error], warnings))?;
        return Ok(ExitCode::from(1));
    }

    let routes: BTreeMap<String, usize> = result
        .composition
        .route_counts()
        .iter()
        .map(|(route, count)| (route.as_str().to_string(), *count))
        .collect();

    let record = GenerateRecord {
        id: spec.id.clone(),
        seed: spec.seed,
        choruses: spec.choruses,
        spec_hash: result.spec_hash.clone(),
        midi_hash: result.hash.clone(),
        output_path: path.display().to_string(),
        midi_bytes: result.midi.len(),
        chords: result.chords.iter().map(|c| c.to_string()).collect(),
        cell_count: result.composition.len(),
        note_count: result.composition.note_count(),
        routes,
        cells: composition_to_json(&result.composition),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    print_json(&GenerateOutput::success(record, warnings))?;
    Ok(ExitCode::SUCCESS)
}
