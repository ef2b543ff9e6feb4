//! Error types for melody construction.

use improvisor_spec::BackendError;
use thiserror::Error;

/// Errors raised while setting up a sequencer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MelodyError {
    #[error("progression contains no chords")]
    EmptyProgression,

    #[error("pattern library is empty")]
    EmptyPatternLibrary,

    #[error("pattern {index} has no degrees")]
    EmptyPattern { index: usize },

    #[error("pattern {index} has {len} degrees, maximum is {max}")]
    PatternTooLong { index: usize, len: usize, max: usize },

    #[error("choruses must be at least 1")]
    ZeroChoruses,

    #[error("candidate pool for chord {chord_index} ({chord}) is empty")]
    EmptyCandidatePool { chord_index: usize, chord: String },
}

impl BackendError for MelodyError {
    fn code(&self) -> &'static str {
        match self {
            MelodyError::EmptyProgression => "MELODY_001",
            MelodyError::EmptyPatternLibrary => "MELODY_002",
            MelodyError::EmptyPattern { .. } => "MELODY_003",
            MelodyError::PatternTooLong { .. } => "MELODY_004",
            MelodyError::ZeroChoruses => "MELODY_005",
            MelodyError::EmptyCandidatePool { .. } => "MELODY_006",
        }
    }

    fn category(&self) -> &'static str {
        "melody"
    }
}

/// No target tone lies within a whole step of the source pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no chord tone within a whole step of MIDI {source_midi}")]
pub struct NoLeadingFound {
    pub source_midi: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            MelodyError::EmptyProgression,
            MelodyError::EmptyPatternLibrary,
            MelodyError::EmptyPattern { index: 0 },
            MelodyError::PatternTooLong {
                index: 0,
                len: 9,
                max: 8,
            },
            MelodyError::ZeroChoruses,
            MelodyError::EmptyCandidatePool {
                chord_index: 0,
                chord: "Am".to_string(),
            },
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(errors.iter().all(|e| e.category() == "melody"));
    }

    #[test]
    fn test_messages() {
        let err = MelodyError::PatternTooLong {
            index: 2,
            len: 9,
            max: 8,
        };
        assert_eq!(err.to_string(), "pattern 2 has 9 degrees, maximum is 8");
        assert_eq!(
            NoLeadingFound { source_midi: 60 }.to_string(),
            "no chord tone within a whole step of MIDI 60"
        );
    }
}
