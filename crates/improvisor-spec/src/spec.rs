//! The improv spec: a JSON request describing one generated solo.

use serde::{Deserialize, Serialize};

use crate::chord::{parse_progression, ParsedProgression};
use crate::pattern::{default_patterns, CellPattern};

/// Current spec version.
pub const SPEC_VERSION: u32 = 1;

/// Chorus count used when the spec does not set one.
pub const DEFAULT_CHORUSES: u32 = 5;

/// Tempo used when the spec does not set one.
pub const DEFAULT_TEMPO_BPM: u16 = 120;

/// Rhythmic value given to every note of the solo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteValue {
    Quarter,
    #[default]
    Eighth,
    Sixteenth,
}

impl NoteValue {
    /// Length of the note in ticks at the given resolution.
    pub fn ticks(self, ticks_per_quarter: u32) -> u32 {
        match self {
            NoteValue::Quarter => ticks_per_quarter,
            NoteValue::Eighth => ticks_per_quarter / 2,
            NoteValue::Sixteenth => ticks_per_quarter / 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteValue::Quarter => "quarter",
            NoteValue::Eighth => "eighth",
            NoteValue::Sixteenth => "sixteenth",
        }
    }
}

impl std::str::FromStr for NoteValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quarter" => Ok(NoteValue::Quarter),
            "eighth" => Ok(NoteValue::Eighth),
            "sixteenth" => Ok(NoteValue::Sixteenth),
            _ => Err(format!("unknown note value: {}", s)),
        }
    }
}

/// How a candidate cell's first pitch is compared with the voice-led pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateMatch {
    /// Same chromatic value (same MIDI note).
    #[default]
    ExactPitch,
    /// Same pitch class in any octave.
    PitchClass,
}

/// When the sequencer runs its second, first-pitch leading attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Lead the first pitch again only when the first filter found nothing.
    #[default]
    OnlyIfEmpty,
    /// Always lead the first pitch again and append its matches to the
    /// candidates already found.
    AlwaysRefilter,
}

/// An improv spec.
///
/// Everything except `spec_version`, `id` and `progression` has a default,
/// so the smallest useful spec is:
///
/// ```
/// use improvisor_spec::ImprovSpec;
///
/// let spec = ImprovSpec::from_json(
///     r#"{"spec_version": 1, "id": "blues-01", "progression": "C7,F7,C7,G7"}"#,
/// ).unwrap();
/// assert_eq!(spec.choruses, 5);
/// assert_eq!(spec.patterns.len(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImprovSpec {
    /// Schema version; must be 1.
    pub spec_version: u32,

    /// Stable identifier. Format: `[a-z][a-z0-9_-]{2,63}`
    pub id: String,

    /// Comma-separated chord symbols, e.g. `"Am,D7,GMaj"`.
    pub progression: String,

    /// Pattern library expanded over every chord.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<CellPattern>,

    /// Number of passes through the progression.
    #[serde(default = "default_choruses")]
    pub choruses: u32,

    /// RNG seed for deterministic generation.
    #[serde(default)]
    pub seed: u32,

    /// Playback tempo in beats per minute.
    #[serde(default = "default_tempo_bpm")]
    pub tempo_bpm: u16,

    #[serde(default)]
    pub note_value: NoteValue,

    #[serde(default)]
    pub candidate_match: CandidateMatch,

    #[serde(default)]
    pub retry_policy: RetryPolicy,

    /// Remove value-duplicate cells from each candidate pool.
    #[serde(default)]
    pub deduplicate_candidates: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_choruses() -> u32 {
    DEFAULT_CHORUSES
}

fn default_tempo_bpm() -> u16 {
    DEFAULT_TEMPO_BPM
}

impl ImprovSpec {
    /// Creates a new spec builder.
    pub fn builder(id: impl Into<String>, progression: impl Into<String>) -> ImprovSpecBuilder {
        ImprovSpecBuilder::new(id, progression)
    }

    /// Parses a spec from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the spec to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the spec to pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the spec to a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Parses the progression string.
    pub fn parsed_progression(&self) -> ParsedProgression {
        parse_progression(&self.progression)
    }
}

/// Builder for constructing ImprovSpec instances.
#[derive(Debug, Clone)]
pub struct ImprovSpecBuilder {
    spec: ImprovSpec,
}

impl ImprovSpecBuilder {
    /// Creates a new builder with every optional field at its default.
    pub fn new(id: impl Into<String>, progression: impl Into<String>) -> Self {
        Self {
            spec: ImprovSpec {
                spec_version: SPEC_VERSION,
                id: id.into(),
                progression: progression.into(),
                patterns: default_patterns(),
                choruses: DEFAULT_CHORUSES,
                seed: 0,
                tempo_bpm: DEFAULT_TEMPO_BPM,
                note_value: NoteValue::default(),
                candidate_match: CandidateMatch::default(),
                retry_policy: RetryPolicy::default(),
                deduplicate_candidates: false,
                description: None,
            },
        }
    }

    /// Replaces the pattern library.
    pub fn patterns(mut self, patterns: Vec<CellPattern>) -> Self {
        self.spec.patterns = patterns;
        self
    }

    /// Adds a pattern to the library.
    pub fn pattern(mut self, degrees: impl Into<Vec<i32>>) -> Self {
        self.spec.patterns.push(CellPattern::new(degrees));
        self
    }

    pub fn choruses(mut self, choruses: u32) -> Self {
        self.spec.choruses = choruses;
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.spec.seed = seed;
        self
    }

    pub fn tempo_bpm(mut self, tempo_bpm: u16) -> Self {
        self.spec.tempo_bpm = tempo_bpm;
        self
    }

    pub fn note_value(mut self, note_value: NoteValue) -> Self {
        self.spec.note_value = note_value;
        self
    }

    pub fn candidate_match(mut self, candidate_match: CandidateMatch) -> Self {
        self.spec.candidate_match = candidate_match;
        self
    }

    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.spec.retry_policy = retry_policy;
        self
    }

    pub fn deduplicate_candidates(mut self, deduplicate: bool) -> Self {
        self.spec.deduplicate_candidates = deduplicate;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.spec.description = Some(description.into());
        self
    }

    /// Builds the spec.
    pub fn build(self) -> ImprovSpec {
        self.spec
    }
}
