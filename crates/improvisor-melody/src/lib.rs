//! Improvisor Melody Backend - Deterministic Cell-Based Solo Generation
//!
//! This crate turns a chord progression into an improvised melodic line. For
//! every chord it expands a small library of scale-degree patterns into a pool
//! of candidate cells (every permutation, an octave-lower copy, and every
//! rotation of each). A sequencer then walks the progression chorus by chorus,
//! leading the end of each cell by half or whole step into the next chord's
//! triad and picking a candidate cell that starts on the led pitch.
//!
//! # Determinism
//!
//! Given the same spec and seed, the composition and the rendered MIDI bytes
//! are identical. All randomness flows through a PCG32 generator seeded via
//! BLAKE3 derivation from the spec seed.
//!
//! # Example
//!
//! ```
//! use improvisor_melody::generate::generate_melody;
//! use improvisor_melody::listing::render_listing;
//! use improvisor_spec::ImprovSpec;
//!
//! let spec = ImprovSpec::builder("giant-steps-01", improvisor_spec::GIANT_STEPS)
//!     .seed(42)
//!     .build();
//!
//! let result = generate_melody(&spec).unwrap();
//! println!("{}", render_listing(&result.composition));
//! println!("MIDI hash: {}", result.hash);
//! ```
//!
//! # Module Structure
//!
//! - [`pitch`]: Spelled pitches and diatonic intervals
//! - [`scale`]: Scales and scale-degree resolution
//! - [`cell`]: Melodic cells, inversions and target triads
//! - [`expand`]: Pattern library expansion into candidate pools
//! - [`voice_leading`]: Nearest-tone voice leading
//! - [`sequencer`]: The progression sequencer
//! - [`composition`]: The generated solo and its note events
//! - [`midi`]: Standard MIDI File writer
//! - [`listing`]: Text listing renderer
//! - [`generate`]: Main generation entry point

pub mod cell;
pub mod composition;
pub mod error;
pub mod expand;
pub mod generate;
pub mod listing;
pub mod midi;
pub mod pitch;
pub mod rng;
pub mod scale;
pub mod sequencer;
pub mod voice_leading;

pub use cell::{build_cell, target_triad, MelodicCell};
pub use composition::{ComposedCell, Composition, NoteEvent, Route, TICKS_PER_QUARTER};
pub use error::{MelodyError, NoLeadingFound};
pub use expand::{expand, CandidatePool};
pub use generate::{generate_melody, GenerateError, GenerateResult};
pub use pitch::{Interval, Pitch};
pub use scale::{resolve_degree, Scale};
pub use sequencer::{Sequencer, SequencerOptions, SequencerState};
pub use voice_leading::{lead, LedTone, Motion};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
