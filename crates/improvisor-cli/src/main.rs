//! Improvisor CLI - Command-line interface for improvised solo generation
//!
//! This binary provides commands for validating specs, inspecting candidate
//! pools and generating MIDI solos.

mod cli_args;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli_args::{Cli, Commands};
use improvisor_cli::commands;
use improvisor_cli::commands::generate::GenerateArgs;
use improvisor_cli::input::SpecOverrides;

/// Default log filter for a `-v` count.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            spec,
            progression,
            seed,
            choruses,
            tempo,
            note_value,
            out,
            listing,
            json,
        } => {
            let args = GenerateArgs {
                spec_path: spec.as_deref(),
                progression: progression.as_deref(),
                overrides: SpecOverrides {
                    seed,
                    choruses,
                    tempo_bpm: tempo,
                    note_value: note_value.as_deref().and_then(|v| v.parse().ok()),
                },
                out: out.as_deref(),
                listing,
            };
            commands::generate::run(&args, json)
        }
        Commands::Validate { spec, json } => commands::validate::run(&spec, json),
        Commands::Pools {
            spec,
            progression,
            dedupe,
            json,
        } => commands::pools::run(spec.as_deref(), progression.as_deref(), dedupe, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
