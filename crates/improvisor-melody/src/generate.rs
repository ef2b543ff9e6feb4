//! Main entry point for melody generation from improv specs.

use improvisor_spec::chord::{ChordSymbol, RejectedSymbol};
use improvisor_spec::hash::canonical_spec_hash;
use improvisor_spec::validation::validate_spec;
use improvisor_spec::{BackendError, ImprovSpec, SpecError, ValidationError, ValidationWarning};
use thiserror::Error;
use tracing::{info, warn};

use crate::composition::Composition;
use crate::error::MelodyError;
use crate::midi::{render_smf, MidiError, MidiOptions};
use crate::rng::melody_rng;
use crate::sequencer::{Sequencer, SequencerOptions};

/// Error type for melody generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The spec failed validation.
    #[error("spec failed validation with {} error(s)", .0.len())]
    InvalidSpec(Vec<ValidationError>),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Melody(#[from] MelodyError),

    #[error(transparent)]
    Midi(#[from] MidiError),
}

impl BackendError for GenerateError {
    fn code(&self) -> &'static str {
        match self {
            GenerateError::InvalidSpec(_) => "GENERATE_001",
            GenerateError::Spec(_) => "GENERATE_002",
            GenerateError::Melody(err) => err.code(),
            GenerateError::Midi(err) => err.code(),
        }
    }

    fn category(&self) -> &'static str {
        match self {
            GenerateError::Melody(err) => err.category(),
            GenerateError::Midi(err) => err.category(),
            _ => "generate",
        }
    }
}

/// Result of melody generation.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub composition: Composition,
    /// Parsed chords the solo was generated over.
    pub chords: Vec<ChordSymbol>,
    /// Symbols dropped from the progression string.
    pub rejected: Vec<RejectedSymbol>,
    /// Standard MIDI File bytes.
    pub midi: Vec<u8>,
    /// BLAKE3 hash of the MIDI bytes.
    pub hash: String,
    /// Canonical hash of the spec.
    pub spec_hash: String,
    /// Validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

/// Generates a solo and its MIDI rendering from a spec.
///
/// # Example
/// ```
/// use improvisor_melody::generate::generate_melody;
/// use improvisor_spec::ImprovSpec;
///
/// let spec = ImprovSpec::builder("two-five-01", "Am,D7,GMaj")
///     .seed(42)
///     .choruses(2)
///     .build();
///
/// let result = generate_melody(&spec).unwrap();
/// assert_eq!(result.composition.len(), 1 + 2 * 2);
/// assert_eq!(result.hash.len(), 64);
/// ```
pub fn generate_melody(spec: &ImprovSpec) -> Result<GenerateResult, GenerateError> {
    let warnings = validate_spec(spec)
        .into_result()
        .map_err(GenerateError::InvalidSpec)?;
    for warning in &warnings {
        warn!(spec = %spec.id, "{}", warning);
    }

    let parsed = spec.parsed_progression();
    let sequencer = Sequencer::new(
        &parsed.chords,
        &spec.patterns,
        spec.choruses,
        melody_rng(spec.seed),
        SequencerOptions::from_spec(spec),
    )?;
    let composition = sequencer.run();

    let midi = render_smf(
        &composition,
        &MidiOptions {
            tempo_bpm: spec.tempo_bpm,
            note_value: spec.note_value,
            title: spec.id.clone(),
        },
    )?;
    let hash = blake3::hash(&midi).to_hex().to_string();
    let spec_hash = canonical_spec_hash(spec)?;

    let routes = composition.route_counts();
    info!(
        spec = %spec.id,
        cells = composition.len(),
        notes = composition.note_count(),
        repeats = routes[4].1,
        hash = %hash,
        "generated melody"
    );

    Ok(GenerateResult {
        composition,
        chords: parsed.chords,
        rejected: parsed.rejected,
        midi,
        hash,
        spec_hash,
        warnings,
    })
}
