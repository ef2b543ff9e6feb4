//! CLI argument definitions for the improvisor command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{ArgGroup, Parser, Subcommand};

/// Improvisor - Deterministic jazz solo generation over chord progressions
#[derive(Parser)]
#[command(name = "improvisor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate a solo and write it as a Standard MIDI File
    #[command(group(ArgGroup::new("input").required(true).args(["spec", "progression"])))]
    Generate {
        /// Path to the spec file (JSON)
        #[arg(short, long)]
        spec: Option<String>,

        /// Comma-separated chord progression, e.g. "Am,D7,GMaj"
        #[arg(short, long)]
        progression: Option<String>,

        /// Override the spec seed
        #[arg(long)]
        seed: Option<u32>,

        /// Override the number of choruses
        #[arg(long)]
        choruses: Option<u32>,

        /// Override the tempo in beats per minute
        #[arg(long)]
        tempo: Option<u16>,

        /// Override the note value (quarter, eighth, sixteenth)
        #[arg(long, value_parser = ["quarter", "eighth", "sixteenth"])]
        note_value: Option<String>,

        /// Output MIDI file (default: {id}.mid)
        #[arg(short, long)]
        out: Option<String>,

        /// Print the cell listing after generating
        #[arg(long)]
        listing: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate a spec file without generating
    Validate {
        /// Path to the spec file (JSON)
        #[arg(short, long)]
        spec: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show scales, target triads and candidate pool sizes per chord
    #[command(group(ArgGroup::new("input").required(true).args(["spec", "progression"])))]
    Pools {
        /// Path to the spec file (JSON)
        #[arg(short, long)]
        spec: Option<String>,

        /// Comma-separated chord progression
        #[arg(short, long)]
        progression: Option<String>,

        /// Drop duplicate cells from each pool
        #[arg(long)]
        dedupe: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}
