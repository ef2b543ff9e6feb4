//! Improv spec validation.
//!
//! Validation collects every problem it finds instead of stopping at the
//! first one, so a single run of `improvisor validate` reports the whole list.

use std::sync::OnceLock;

use regex::Regex;

use crate::budgets::{candidates_per_chord, max_note_count, GenerationBudget};
use crate::chord::parse_progression;
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::pattern::{MAX_DEGREE, MAX_PATTERN_LEN, MIN_DEGREE};
use crate::spec::{ImprovSpec, SPEC_VERSION};

/// Regex pattern for a valid spec id.
/// Format: starts with lowercase letter, followed by 2-63 lowercase letters, digits, underscores, or hyphens.
const ID_PATTERN: &str = r"^[a-z][a-z0-9_-]{2,63}$";

/// Slowest tempo accepted.
pub const MIN_TEMPO_BPM: u16 = 20;

/// Fastest tempo accepted.
pub const MAX_TEMPO_BPM: u16 = 400;

static ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn id_regex() -> &'static Regex {
    ID_REGEX.get_or_init(|| Regex::new(ID_PATTERN).expect("invalid regex pattern"))
}

/// Validates a spec and returns a validation result.
///
/// # Example
/// ```
/// use improvisor_spec::ImprovSpec;
/// use improvisor_spec::validation::validate_spec;
///
/// let spec = ImprovSpec::builder("blues-01", "C7,F7,C7,G7")
///     .description("twelve bar sketch")
///     .build();
///
/// let result = validate_spec(&spec);
/// assert!(result.is_ok());
/// assert!(result.warnings.is_empty());
/// ```
pub fn validate_spec(spec: &ImprovSpec) -> ValidationResult {
    validate_spec_with_budget(spec, &GenerationBudget::default())
}

/// Validates a spec against explicit resource limits.
pub fn validate_spec_with_budget(spec: &ImprovSpec, budget: &GenerationBudget) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_spec_version(spec, &mut result);
    validate_id(spec, &mut result);
    let chord_count = validate_progression(spec, &mut result);
    validate_patterns(spec, &mut result);
    validate_choruses(spec, budget, &mut result);
    validate_tempo(spec, &mut result);
    validate_budget(spec, chord_count, budget, &mut result);

    if spec.description.as_deref().map_or(true, |d| d.trim().is_empty()) {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::MissingDescription,
            "spec has no description",
            "description",
        ));
    }

    result
}

fn validate_spec_version(spec: &ImprovSpec, result: &mut ValidationResult) {
    if spec.spec_version != SPEC_VERSION {
        result.add_error(ValidationError::with_path(
            ErrorCode::UnsupportedSpecVersion,
            format!(
                "spec_version must be {}, got {}",
                SPEC_VERSION, spec.spec_version
            ),
            "spec_version",
        ));
    }
}

fn validate_id(spec: &ImprovSpec, result: &mut ValidationResult) {
    if !id_regex().is_match(&spec.id) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidId,
            format!("id must match pattern '{}', got '{}'", ID_PATTERN, spec.id),
            "id",
        ));
    }
}

fn validate_progression(spec: &ImprovSpec, result: &mut ValidationResult) -> usize {
    let parsed = parse_progression(&spec.progression);

    for rejected in &parsed.rejected {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::DroppedChordSymbol,
            format!("dropped '{}': {}", rejected.symbol, rejected.error),
            format!("progression[{}]", rejected.index),
        ));
    }

    match parsed.chords.len() {
        0 => result.add_error(ValidationError::with_path(
            ErrorCode::EmptyProgression,
            "progression contains no parseable chord symbols",
            "progression",
        )),
        1 => result.add_warning(ValidationWarning::with_path(
            WarningCode::SingleChordProgression,
            "progression has a single chord; only the opening cell will be generated",
            "progression",
        )),
        _ => {}
    }
    parsed.chords.len()
}

fn validate_patterns(spec: &ImprovSpec, result: &mut ValidationResult) {
    if spec.patterns.is_empty() {
        result.add_error(ValidationError::with_path(
            ErrorCode::EmptyPatternLibrary,
            "pattern library must contain at least one pattern",
            "patterns",
        ));
        return;
    }

    for (i, pattern) in spec.patterns.iter().enumerate() {
        let path = format!("patterns[{}]", i);

        if pattern.is_empty() {
            result.add_error(ValidationError::with_path(
                ErrorCode::EmptyPattern,
                "pattern must contain at least one degree",
                path,
            ));
            continue;
        }

        if pattern.len() > MAX_PATTERN_LEN {
            result.add_error(ValidationError::with_path(
                ErrorCode::PatternTooLong,
                format!(
                    "pattern has {} degrees, maximum is {}",
                    pattern.len(),
                    MAX_PATTERN_LEN
                ),
                path.clone(),
            ));
        }

        for (j, &degree) in pattern.degrees().iter().enumerate() {
            if !(MIN_DEGREE..=MAX_DEGREE).contains(&degree) {
                result.add_error(ValidationError::with_path(
                    ErrorCode::DegreeOutOfRange,
                    format!(
                        "degree {} is outside {}..={}",
                        degree, MIN_DEGREE, MAX_DEGREE
                    ),
                    format!("{}[{}]", path, j),
                ));
            }
        }
    }
}

fn validate_choruses(spec: &ImprovSpec, budget: &GenerationBudget, result: &mut ValidationResult) {
    if spec.choruses == 0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::ZeroChoruses,
            "choruses must be at least 1",
            "choruses",
        ));
    } else if spec.choruses > budget.max_choruses {
        result.add_error(ValidationError::with_path(
            ErrorCode::TooManyChoruses,
            format!(
                "choruses is {}, maximum is {}",
                spec.choruses, budget.max_choruses
            ),
            "choruses",
        ));
    }
}

fn validate_tempo(spec: &ImprovSpec, result: &mut ValidationResult) {
    if !(MIN_TEMPO_BPM..=MAX_TEMPO_BPM).contains(&spec.tempo_bpm) {
        result.add_error(ValidationError::with_path(
            ErrorCode::TempoOutOfRange,
            format!(
                "tempo_bpm must be in {}..={}, got {}",
                MIN_TEMPO_BPM, MAX_TEMPO_BPM, spec.tempo_bpm
            ),
            "tempo_bpm",
        ));
    }
}

fn validate_budget(
    spec: &ImprovSpec,
    chord_count: usize,
    budget: &GenerationBudget,
    result: &mut ValidationResult,
) {
    let total_candidates =
        candidates_per_chord(&spec.patterns).saturating_mul(chord_count as u64);
    if total_candidates > budget.max_total_candidates {
        result.add_error(ValidationError::with_path(
            ErrorCode::CandidateBudgetExceeded,
            format!(
                "{} chords expand to {} candidate cells, maximum is {}",
                chord_count, total_candidates, budget.max_total_candidates
            ),
            "patterns",
        ));
    }

    let notes = max_note_count(chord_count, spec.choruses, &spec.patterns);
    if notes > budget.max_notes {
        result.add_error(ValidationError::with_path(
            ErrorCode::NoteBudgetExceeded,
            format!(
                "solo may reach {} notes, maximum is {}",
                notes, budget.max_notes
            ),
            "choruses",
        ));
    }
}
