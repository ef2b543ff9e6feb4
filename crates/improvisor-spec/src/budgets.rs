//! Resource limits enforced at validation time.
//!
//! Expansion grows factorially with pattern length and the composition grows
//! linearly with the chorus count, so both are bounded before a sequencer is
//! ever built.

use serde::{Deserialize, Serialize};

use crate::pattern::CellPattern;

/// Generation budget limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationBudget {
    /// Maximum number of candidate cells across every chord's pool.
    pub max_total_candidates: u64,
    /// Maximum number of choruses.
    pub max_choruses: u32,
    /// Maximum number of notes in the rendered solo.
    pub max_notes: u64,
}

impl Default for GenerationBudget {
    fn default() -> Self {
        Self {
            max_total_candidates: Self::DEFAULT_MAX_TOTAL_CANDIDATES,
            max_choruses: Self::DEFAULT_MAX_CHORUSES,
            max_notes: Self::DEFAULT_MAX_NOTES,
        }
    }
}

impl GenerationBudget {
    /// Default maximum number of candidate cells.
    pub const DEFAULT_MAX_TOTAL_CANDIDATES: u64 = 1_000_000;

    /// Default maximum number of choruses.
    pub const DEFAULT_MAX_CHORUSES: u32 = 1_000;

    /// Default maximum number of notes.
    pub const DEFAULT_MAX_NOTES: u64 = 1_000_000;
}

/// Number of candidate cells a library expands to over one chord.
///
/// Saturates instead of overflowing for libraries that could never fit a
/// budget anyway.
pub fn candidates_per_chord(patterns: &[CellPattern]) -> u64 {
    patterns.iter().fold(0u64, |total, pattern| {
        let len = pattern.len() as u64;
        let size = (1..=len)
            .fold(1u64, |acc, n| acc.saturating_mul(n))
            .saturating_mul(2)
            .saturating_mul(len);
        total.saturating_add(size)
    })
}

/// Upper bound on the notes in a solo: every cell at the longest pattern
/// length.
pub fn max_note_count(chord_count: usize, choruses: u32, patterns: &[CellPattern]) -> u64 {
    let transitions = (chord_count as u64).saturating_sub(1);
    let cells = transitions
        .saturating_mul(u64::from(choruses))
        .saturating_add(1);
    let longest = patterns.iter().map(CellPattern::len).max().unwrap_or(0) as u64;
    cells.saturating_mul(longest)
}
