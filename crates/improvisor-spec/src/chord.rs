//! Chord symbol vocabulary and parsing.
//!
//! A progression is written as comma-separated chord symbols such as
//! `"D-Maj,E7,AMaj,Bm"`. Each symbol is a root (letter plus optional `#`,
//! `-` or `b`) followed by a quality suffix: `Maj` (major), `m` (minor,
//! dorian) or `7` (dominant, mixolydian). Symbols that do not follow this
//! grammar are rejected individually; [`parse_progression`] keeps the valid
//! ones and reports the rest.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diatonic note letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// All letters in ascending order starting at C.
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position of the letter within the octave (C = 0 .. B = 6).
    pub fn index(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// Semitones of the natural note above C.
    pub fn semitone(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Letter at an arbitrary (possibly negative) index, wrapping by octave.
    pub fn from_index(index: i32) -> Letter {
        Letter::ALL[index.rem_euclid(7) as usize]
    }

    fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// Writes an alteration as repeated `#` or `b` characters.
pub fn write_alter(f: &mut fmt::Formatter<'_>, alter: i32) -> fmt::Result {
    let symbol = if alter > 0 { '#' } else { 'b' };
    for _ in 0..alter.unsigned_abs() {
        write!(f, "{}", symbol)?;
    }
    Ok(())
}

/// A pitch name without octave, e.g. `Db` or `F#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitchName {
    pub letter: Letter,
    /// Chromatic alteration in semitones (-1 flat, +1 sharp).
    pub alter: i32,
}

impl PitchName {
    pub fn new(letter: Letter, alter: i32) -> Self {
        Self { letter, alter }
    }

    pub fn natural(letter: Letter) -> Self {
        Self::new(letter, 0)
    }

    /// Pitch class in 0..12 (C = 0).
    pub fn pitch_class(&self) -> i32 {
        (self.letter.semitone() + self.alter).rem_euclid(12)
    }
}

impl fmt::Display for PitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        write_alter(f, self.alter)
    }
}

impl FromStr for PitchName {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars
            .next()
            .and_then(Letter::from_char)
            .ok_or_else(|| ChordParseError::InvalidRoot(s.to_string()))?;
        let alter = match chars.as_str() {
            "" => 0,
            "#" => 1,
            "-" | "b" => -1,
            _ => return Err(ChordParseError::InvalidRoot(s.to_string())),
        };
        Ok(PitchName::new(letter, alter))
    }
}

/// Chord quality, which selects the scale built over the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Major chord over the ionian scale.
    Major,
    /// Minor chord over the dorian scale.
    Minor,
    /// Dominant seventh chord over the mixolydian scale.
    Dominant,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Major => "major",
            Quality::Minor => "minor",
            Quality::Dominant => "dominant",
        }
    }

    /// Suffix used in chord symbols.
    pub fn suffix(&self) -> &'static str {
        match self {
            Quality::Major => "Maj",
            Quality::Minor => "m",
            Quality::Dominant => "7",
        }
    }

    /// Name of the mode the quality improvises over.
    pub fn mode_name(&self) -> &'static str {
        match self {
            Quality::Major => "ionian",
            Quality::Minor => "dorian",
            Quality::Dominant => "mixolydian",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Quality> {
        match suffix {
            "Maj" => Some(Quality::Major),
            "m" => Some(Quality::Minor),
            "7" => Some(Quality::Dominant),
            _ => None,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Quality {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Quality::Major),
            "minor" => Ok(Quality::Minor),
            "dominant" => Ok(Quality::Dominant),
            _ => Err(ChordParseError::UnresolvableQuality(s.to_string())),
        }
    }
}

/// A validated (root, quality) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChordSymbol {
    pub root: PitchName,
    pub quality: Quality,
}

impl ChordSymbol {
    pub fn new(root: PitchName, quality: Quality) -> Self {
        Self { root, quality }
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality.suffix())
    }
}

impl FromStr for ChordSymbol {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_chord_symbol(s)
    }
}

/// Errors produced while reading chord symbols and qualities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordParseError {
    #[error("chord symbol is empty")]
    Empty,
    #[error("invalid chord root '{0}'")]
    InvalidRoot(String),
    #[error("unknown chord suffix '{suffix}' in '{symbol}' (expected Maj, m, or 7)")]
    UnknownSuffix { symbol: String, suffix: String },
    #[error("unresolvable quality '{0}' (expected major, minor, or dominant)")]
    UnresolvableQuality(String),
}

/// Parse a single chord symbol such as `"D-Maj"`, `"F#m"` or `"E7"`.
pub fn parse_chord_symbol(symbol: &str) -> Result<ChordSymbol, ChordParseError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ChordParseError::Empty);
    }

    let mut root_len = symbol.chars().next().map(char::len_utf8).unwrap_or(1);
    if let Some(next) = symbol[root_len..].chars().next() {
        if matches!(next, '#' | '-' | 'b') {
            root_len += 1;
        }
    }

    let root: PitchName = symbol[..root_len].parse()?;
    let suffix = &symbol[root_len..];
    let quality = Quality::from_suffix(suffix).ok_or_else(|| ChordParseError::UnknownSuffix {
        symbol: symbol.to_string(),
        suffix: suffix.to_string(),
    })?;

    Ok(ChordSymbol::new(root, quality))
}

/// A chord symbol that was dropped from a progression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSymbol {
    /// Position of the symbol in the comma-separated input.
    pub index: usize,
    pub symbol: String,
    pub error: ChordParseError,
}

/// Result of parsing a progression string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedProgression {
    pub chords: Vec<ChordSymbol>,
    pub rejected: Vec<RejectedSymbol>,
}

/// Parse a comma-separated progression, dropping symbols that do not parse.
///
/// # Example
/// ```
/// use improvisor_spec::chord::{parse_progression, Quality};
///
/// let parsed = parse_progression("Am,D7,GMaj,Hx");
/// assert_eq!(parsed.chords.len(), 3);
/// assert_eq!(parsed.chords[1].quality, Quality::Dominant);
/// assert_eq!(parsed.rejected[0].symbol, "Hx");
/// ```
pub fn parse_progression(progression: &str) -> ParsedProgression {
    let mut parsed = ParsedProgression::default();
    for (index, symbol) in progression.split(',').enumerate() {
        match parse_chord_symbol(symbol) {
            Ok(chord) => parsed.chords.push(chord),
            Err(error) => parsed.rejected.push(RejectedSymbol {
                index,
                symbol: symbol.trim().to_string(),
                error,
            }),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_roots() {
        let chord = parse_chord_symbol("Am").unwrap();
        assert_eq!(chord.root, PitchName::natural(Letter::A));
        assert_eq!(chord.quality, Quality::Minor);

        let chord = parse_chord_symbol("GMaj").unwrap();
        assert_eq!(chord.root.pitch_class(), 7);
        assert_eq!(chord.quality, Quality::Major);
    }

    #[test]
    fn test_parse_accidentals() {
        let flat = parse_chord_symbol("D-Maj").unwrap();
        assert_eq!(flat.root, PitchName::new(Letter::D, -1));
        assert_eq!(flat.root.pitch_class(), 1);

        let sharp = parse_chord_symbol("F#m").unwrap();
        assert_eq!(sharp.root.pitch_class(), 6);

        let flat_b = parse_chord_symbol("Bb7").unwrap();
        assert_eq!(flat_b.root, PitchName::new(Letter::B, -1));
        assert_eq!(flat_b.quality, Quality::Dominant);
    }

    #[test]
    fn test_cb_wraps_pitch_class() {
        let chord = parse_chord_symbol("C-Maj").unwrap();
        assert_eq!(chord.root.pitch_class(), 11);
    }

    #[test]
    fn test_rejects_unknown_suffix() {
        let err = parse_chord_symbol("Cmaj7").unwrap_err();
        assert!(matches!(err, ChordParseError::UnknownSuffix { .. }));
        assert!(parse_chord_symbol("C").is_err());
        assert!(parse_chord_symbol("Cdim").is_err());
    }

    #[test]
    fn test_rejects_bad_root() {
        assert!(matches!(
            parse_chord_symbol("Hm"),
            Err(ChordParseError::InvalidRoot(_))
        ));
        assert_eq!(parse_chord_symbol("   "), Err(ChordParseError::Empty));
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        for symbol in ["DbMaj", "E7", "F#m", "A7"] {
            let chord = parse_chord_symbol(symbol).unwrap();
            assert_eq!(chord.to_string(), symbol);
        }
    }

    #[test]
    fn test_quality_from_str() {
        assert_eq!("dominant".parse::<Quality>().unwrap(), Quality::Dominant);
        assert_eq!(
            "lydian".parse::<Quality>(),
            Err(ChordParseError::UnresolvableQuality("lydian".to_string()))
        );
    }

    #[test]
    fn test_parse_progression_drops_invalid() {
        let parsed = parse_progression("D-Maj, E7,AMaj,Xyz,,C7");
        assert_eq!(parsed.chords.len(), 4);
        assert_eq!(parsed.rejected.len(), 2);
        assert_eq!(parsed.rejected[0].index, 3);
        assert_eq!(parsed.rejected[1].error, ChordParseError::Empty);
    }

    #[test]
    fn test_giant_steps_parses_completely() {
        let parsed = parse_progression(crate::GIANT_STEPS);
        assert_eq!(parsed.chords.len(), 31);
        assert!(parsed.rejected.is_empty());
    }
}
