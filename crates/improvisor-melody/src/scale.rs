//! Eight-note scales and scale-degree resolution.

use improvisor_spec::chord::{ChordSymbol, PitchName, Quality};

use crate::pitch::{Interval, Pitch};

/// Number of pitches in a scale, root to octave inclusive.
pub const SCALE_LEN: usize = 8;

const IONIAN: [i32; SCALE_LEN] = [0, 2, 4, 5, 7, 9, 11, 12];
const DORIAN: [i32; SCALE_LEN] = [0, 2, 3, 5, 7, 9, 10, 12];
const MIXOLYDIAN: [i32; SCALE_LEN] = [0, 2, 4, 5, 7, 9, 10, 12];

/// Semitone offsets from the root for the mode a quality selects.
pub fn mode_offsets(quality: Quality) -> &'static [i32; SCALE_LEN] {
    match quality {
        Quality::Major => &IONIAN,
        Quality::Minor => &DORIAN,
        Quality::Dominant => &MIXOLYDIAN,
    }
}

/// The 8 pitches from a root to its octave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    root: PitchName,
    quality: Quality,
    pitches: [Pitch; SCALE_LEN],
}

impl Scale {
    /// Builds the scale for a root and quality. Roots sit in octave 4.
    pub fn new(root: PitchName, quality: Quality) -> Self {
        let tonic = Pitch::root(root);
        let offsets = mode_offsets(quality);
        let mut pitches = [tonic; SCALE_LEN];
        for (step, pitch) in pitches.iter_mut().enumerate() {
            *pitch = tonic.transpose(Interval::new(step as i32, offsets[step]));
        }
        Self {
            root,
            quality,
            pitches,
        }
    }

    pub fn for_chord(chord: &ChordSymbol) -> Self {
        Self::new(chord.root, chord.quality)
    }

    pub fn root(&self) -> PitchName {
        self.root
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn pitches(&self) -> &[Pitch; SCALE_LEN] {
        &self.pitches
    }

    /// Scale entry at a zero-based index; `-1` is the last entry.
    fn at(&self, index: i32) -> Pitch {
        self.pitches[index.rem_euclid(SCALE_LEN as i32) as usize]
    }

    /// Resolves a signed scale degree to a pitch.
    ///
    /// - `1..=7` are the scale entries `degree - 1`.
    /// - `8` and above wrap by 8 and move up an octave, so 8 is the octave
    ///   above the root and 9 the second above that.
    /// - Negative degrees use index `degree mod 8 - 1` and move down an
    ///   octave, so -1 is the seventh below the root.
    /// - `0` is the last entry (the octave) without transposition.
    pub fn resolve_degree(&self, degree: i32) -> Pitch {
        let len = SCALE_LEN as i32;
        if degree >= len {
            self.at(degree % len).transpose(Interval::OCTAVE)
        } else if degree < 0 {
            self.at(degree.rem_euclid(len) - 1)
                .transpose(Interval::OCTAVE.down())
        } else {
            self.at(degree - 1)
        }
    }
}

/// Resolves a degree against a (root, quality) pair.
pub fn resolve_degree(degree: i32, root: PitchName, quality: Quality) -> Pitch {
    Scale::new(root, quality).resolve_degree(degree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(root: &str, quality: Quality) -> Scale {
        Scale::new(root.parse().unwrap(), quality)
    }

    fn names(scale: &Scale) -> Vec<String> {
        scale.pitches().iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_a_dorian() {
        let a = scale("A", Quality::Minor);
        assert_eq!(
            names(&a),
            ["A4", "B4", "C5", "D5", "E5", "F#5", "G5", "A5"]
        );
        assert_eq!(a.pitches()[0].midi, 69);
        assert_eq!(a.pitches()[7].midi, 81);
    }

    #[test]
    fn test_flat_root_spelling() {
        let d_flat = scale("D-", Quality::Major);
        assert_eq!(
            names(&d_flat),
            ["Db4", "Eb4", "F4", "Gb4", "Ab4", "Bb4", "C5", "Db5"]
        );
    }

    #[test]
    fn test_d_mixolydian() {
        let d = scale("D", Quality::Dominant);
        assert_eq!(
            names(&d),
            ["D4", "E4", "F#4", "G4", "A4", "B4", "C5", "D5"]
        );
    }

    #[test]
    fn test_scales_ascend_over_one_octave() {
        for letter in ["C", "D-", "F#", "B", "E-"] {
            for quality in [Quality::Major, Quality::Minor, Quality::Dominant] {
                let s = scale(letter, quality);
                let p = s.pitches();
                assert!(p.windows(2).all(|w| w[0].midi < w[1].midi));
                assert_eq!(p[7].midi - p[0].midi, 12);
            }
        }
    }

    #[test]
    fn test_resolve_degree_branches() {
        let c = scale("C", Quality::Major);
        assert_eq!(c.resolve_degree(1).midi, 60);
        assert_eq!(c.resolve_degree(5).midi, 67);
        assert_eq!(c.resolve_degree(7).midi, 71);
        // 8 goes through the upper branch: root + octave
        assert_eq!(c.resolve_degree(8).midi, 72);
        assert_eq!(c.resolve_degree(9).midi, 74);
        assert_eq!(c.resolve_degree(11).midi, 77);
        assert_eq!(c.resolve_degree(15).midi, 84);
        assert_eq!(c.resolve_degree(-1).midi, 59);
        assert_eq!(c.resolve_degree(-2).midi, 57);
        assert_eq!(c.resolve_degree(-8).midi, 60);
        assert_eq!(c.resolve_degree(0).midi, 72);
    }

    #[test]
    fn test_diatonic_octave_law() {
        let a = scale("A", Quality::Minor);
        for degree in 1..=7 {
            assert_eq!(
                a.resolve_degree(degree + 7).midi,
                a.resolve_degree(degree).midi + 12,
                "degree {}",
                degree
            );
            assert_eq!(
                a.resolve_degree(-degree).midi,
                a.resolve_degree(8 - degree).midi - 12,
                "degree -{}",
                degree
            );
        }
    }

    #[test]
    fn test_resolve_degree_free_function() {
        let root: PitchName = "A".parse().unwrap();
        assert_eq!(resolve_degree(3, root, Quality::Minor).to_string(), "C5");
        assert_eq!(resolve_degree(3, root, Quality::Major).to_string(), "C#5");
    }
}
