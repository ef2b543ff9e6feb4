//! Cell patterns: short sequences of signed scale degrees.

use serde::{Deserialize, Serialize};

/// Longest pattern accepted by validation. Expansion grows as `L! * 2 * L`.
pub const MAX_PATTERN_LEN: usize = 8;

/// Lowest scale degree a pattern may use.
pub const MIN_DEGREE: i32 = -8;

/// Highest scale degree a pattern may use.
pub const MAX_DEGREE: i32 = 15;

/// A sequence of scale degrees (1 = root, 8 = octave, negatives below the root).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellPattern(pub Vec<i32>);

impl CellPattern {
    pub fn new(degrees: impl Into<Vec<i32>>) -> Self {
        Self(degrees.into())
    }

    pub fn degrees(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of candidate cells this pattern expands into: `L! * 2 * L`.
    pub fn expansion_size(&self) -> usize {
        let len = self.len();
        (1..=len).product::<usize>() * 2 * len
    }
}

impl From<Vec<i32>> for CellPattern {
    fn from(degrees: Vec<i32>) -> Self {
        Self(degrees)
    }
}

/// The built-in pattern library.
///
/// `[5, 6, 7, 8]` appears twice on purpose; it doubles the weight of that
/// shape in every candidate pool.
pub fn default_patterns() -> Vec<CellPattern> {
    [
        [1, 2, 3, 5],
        [1, -2, -1, 1],
        [1, 3, 5, -1],
        [4, 3, 2, 1],
        [5, 4, 3, 1],
        [1, 2, 3, 1],
        [3, 2, 1, -1],
        [5, 6, 7, 8],
        [3, 4, 5, 7],
        [9, 7, 5, 3],
        [5, 7, 9, 11],
        [5, 6, 7, 8],
    ]
    .iter()
    .map(|p| CellPattern::new(p.to_vec()))
    .collect()
}
