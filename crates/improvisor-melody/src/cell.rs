//! Melodic cells: short ordered pitch sequences.

use std::fmt;

use improvisor_spec::chord::{PitchName, Quality};
use serde::Serialize;

use crate::pitch::{Interval, Pitch};
use crate::scale::Scale;

/// An ordered sequence of pitches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MelodicCell(Vec<Pitch>);

impl MelodicCell {
    pub fn new(pitches: Vec<Pitch>) -> Self {
        Self(pitches)
    }

    pub fn pitches(&self) -> &[Pitch] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Pitch> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Pitch> {
        self.0.last()
    }

    /// MIDI values of every pitch, in order.
    pub fn midi(&self) -> Vec<i32> {
        self.0.iter().map(|p| p.midi).collect()
    }

    /// Every pitch moved by the same interval.
    pub fn transpose(&self, interval: Interval) -> Self {
        Self(self.0.iter().map(|p| p.transpose(interval)).collect())
    }

    /// The cell itself followed by its rotations.
    ///
    /// Each rotation takes the previous one, drops its first pitch and
    /// appends that pitch an octave higher. A cell of length `L` yields `L`
    /// cells, the first being the cell unchanged.
    pub fn inversions(&self) -> Vec<MelodicCell> {
        let mut out = Vec::with_capacity(self.len());
        if self.is_empty() {
            return out;
        }
        let mut current = self.clone();
        for _ in 1..self.len() {
            let mut next = current.0[1..].to_vec();
            next.push(current.0[0].transpose(Interval::OCTAVE));
            out.push(current);
            current = MelodicCell(next);
        }
        out.push(current);
        out
    }
}

impl fmt::Display for MelodicCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pitch) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", pitch)?;
        }
        Ok(())
    }
}

/// Resolves each degree against one scale, keeping input order.
pub fn build_cell_in(degrees: &[i32], scale: &Scale) -> MelodicCell {
    MelodicCell(degrees.iter().map(|d| scale.resolve_degree(*d)).collect())
}

/// Resolves each degree against the scale of `root` and `quality`.
pub fn build_cell(degrees: &[i32], root: PitchName, quality: Quality) -> MelodicCell {
    build_cell_in(degrees, &Scale::new(root, quality))
}

/// Triad of degrees 1, 3, 5: the tones a line leads into.
pub fn target_triad(root: PitchName, quality: Quality) -> MelodicCell {
    build_cell(&[1, 3, 5], root, quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> PitchName {
        "A".parse().unwrap()
    }

    #[test]
    fn test_build_cell_preserves_order() {
        let cell = build_cell(&[5, 1, 3, 2], a(), Quality::Minor);
        assert_eq!(cell.to_string(), "E5 A4 C5 B4");
        assert_eq!(cell.midi(), vec![76, 69, 72, 71]);
    }

    #[test]
    fn test_target_triad() {
        let d7 = target_triad("D".parse().unwrap(), Quality::Dominant);
        assert_eq!(d7.midi(), vec![62, 66, 69]);
    }

    #[test]
    fn test_inversions() {
        let cell = build_cell(&[1, 2, 3, 5], a(), Quality::Minor);
        let inversions = cell.inversions();
        assert_eq!(inversions.len(), 4);
        assert_eq!(inversions[0], cell);
        assert_eq!(inversions[1].midi(), vec![71, 72, 76, 81]);
        assert_eq!(inversions[2].midi(), vec![72, 76, 81, 83]);
        assert_eq!(inversions[3].midi(), vec![76, 81, 83, 84]);
    }

    #[test]
    fn test_inversions_of_single_and_empty() {
        let single = build_cell(&[1], a(), Quality::Minor);
        assert_eq!(single.inversions(), vec![single.clone()]);
        assert!(MelodicCell::new(Vec::new()).inversions().is_empty());
    }

    #[test]
    fn test_transpose_down_octave() {
        let cell = build_cell(&[1, 3], a(), Quality::Minor);
        assert_eq!(cell.transpose(Interval::OCTAVE.down()).midi(), vec![57, 60]);
    }
}
