//! Spelled pitches and diatonic intervals.
//!
//! A [`Pitch`] carries both a chromatic value (the MIDI note number, C4 = 60)
//! and a spelling (letter, alteration, octave). Transposing by an
//! [`Interval`] moves both: a minor second from E gives F, a minor second
//! from F gives Gb, and a perfect octave keeps the letter.

use std::fmt;

use improvisor_spec::chord::{write_alter, Letter, PitchName};
use serde::Serialize;

/// Octave that chord roots are placed in (C4 = MIDI 60).
pub const ROOT_OCTAVE: i32 = 4;

/// A diatonic interval: letter steps plus semitones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub steps: i32,
    pub semitones: i32,
}

impl Interval {
    /// Minor second.
    pub const MINOR_SECOND: Interval = Interval::new(1, 1);
    /// Major second.
    pub const MAJOR_SECOND: Interval = Interval::new(1, 2);
    /// Perfect octave.
    pub const OCTAVE: Interval = Interval::new(7, 12);

    pub const fn new(steps: i32, semitones: i32) -> Self {
        Self { steps, semitones }
    }

    /// The same interval in the opposite direction.
    pub const fn down(self) -> Self {
        Self::new(-self.steps, -self.semitones)
    }
}

/// Letter, alteration and octave of a pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Spelling {
    pub letter: Letter,
    pub alter: i32,
    pub octave: i32,
}

/// A concrete pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pitch {
    /// Chromatic value; equal to the MIDI note number inside 0..=127.
    pub midi: i32,
    pub spelling: Spelling,
}

impl Pitch {
    /// Builds a pitch from a pitch name and an octave number.
    pub fn from_name(name: PitchName, octave: i32) -> Self {
        let midi = (octave + 1) * 12 + name.letter.semitone() + name.alter;
        Self {
            midi,
            spelling: Spelling {
                letter: name.letter,
                alter: name.alter,
                octave,
            },
        }
    }

    /// The pitch of a chord root, placed in [`ROOT_OCTAVE`].
    pub fn root(name: PitchName) -> Self {
        Self::from_name(name, ROOT_OCTAVE)
    }

    pub fn pitch_class(&self) -> i32 {
        self.midi.rem_euclid(12)
    }

    /// Transposes by a diatonic interval, respelling the result.
    pub fn transpose(&self, interval: Interval) -> Self {
        let letter_pos = self.spelling.letter.index() + interval.steps;
        let letter = Letter::from_index(letter_pos);
        let octave = self.spelling.octave + letter_pos.div_euclid(7);
        let midi = self.midi + interval.semitones;
        let natural = (octave + 1) * 12 + letter.semitone();
        Self {
            midi,
            spelling: Spelling {
                letter,
                alter: midi - natural,
                octave,
            },
        }
    }

    /// Convenience for a whole number of octaves.
    pub fn octaves(&self, count: i32) -> Self {
        let mut pitch = *self;
        let interval = if count < 0 {
            Interval::OCTAVE.down()
        } else {
            Interval::OCTAVE
        };
        for _ in 0..count.unsigned_abs() {
            pitch = pitch.transpose(interval);
        }
        pitch
    }

    /// MIDI key, if the pitch is inside the MIDI range.
    pub fn midi_key(&self) -> Option<u8> {
        u8::try_from(self.midi).ok().filter(|key| *key <= 127)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spelling.letter.as_char())?;
        write_alter(f, self.spelling.alter)?;
        write!(f, "{}", self.spelling.octave)
    }
}
