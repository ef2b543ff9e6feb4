//! Nearest-tone voice leading.
//!
//! A source pitch is moved by a half or whole step according to its distance
//! to each tone of a target triad, taken as the absolute MIDI difference
//! modulo 12. Half steps win over whole steps and whole steps win over
//! staying put. Tones whose distance falls between 3 and 9 are ignored.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::cell::MelodicCell;
use crate::error::NoLeadingFound;
use crate::pitch::{Interval, Pitch};

/// How far a led tone moved from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    HalfStep,
    WholeStep,
    Unison,
}

/// The result of a successful lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedTone {
    pub pitch: Pitch,
    pub motion: Motion,
}

impl LedTone {
    pub fn is_unison(&self) -> bool {
        self.motion == Motion::Unison
    }
}

/// Step `source` by the absolute distance to `tone`, if that distance is
/// within a whole step modulo the octave.
///
/// Distances of 1 and 2 move down and distances of 11 and 10 move up,
/// whichever side of the source the tone sits on.
fn step_toward(source: &Pitch, tone: &Pitch) -> Option<(Motion, Pitch)> {
    match (source.midi - tone.midi).abs() % 12 {
        0 => Some((Motion::Unison, *source)),
        1 => Some((
            Motion::HalfStep,
            source.transpose(Interval::MINOR_SECOND.down()),
        )),
        11 => Some((Motion::HalfStep, source.transpose(Interval::MINOR_SECOND))),
        2 => Some((
            Motion::WholeStep,
            source.transpose(Interval::MAJOR_SECOND.down()),
        )),
        10 => Some((Motion::WholeStep, source.transpose(Interval::MAJOR_SECOND))),
        _ => None,
    }
}

/// Leads `source` by a step chosen from its distances to the tones of `target`.
///
/// Half-step options are preferred, then whole-step options, each chosen
/// uniformly at random when there are several; a unison returns the source
/// unchanged.
pub fn lead<R: Rng + ?Sized>(
    source: &Pitch,
    target: &MelodicCell,
    rng: &mut R,
) -> Result<LedTone, NoLeadingFound> {
    let mut half_steps = Vec::new();
    let mut whole_steps = Vec::new();
    let mut unison = false;

    for tone in target.pitches() {
        match step_toward(source, tone) {
            Some((Motion::HalfStep, pitch)) => half_steps.push(pitch),
            Some((Motion::WholeStep, pitch)) => whole_steps.push(pitch),
            Some((Motion::Unison, _)) => unison = true,
            None => {}
        }
    }

    if let Some(pitch) = half_steps.choose(rng) {
        return Ok(LedTone {
            pitch: *pitch,
            motion: Motion::HalfStep,
        });
    }
    if let Some(pitch) = whole_steps.choose(rng) {
        return Ok(LedTone {
            pitch: *pitch,
            motion: Motion::WholeStep,
        });
    }
    if unison {
        return Ok(LedTone {
            pitch: *source,
            motion: Motion::Unison,
        });
    }

    Err(NoLeadingFound {
        source_midi: source.midi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::target_triad;
    use crate::rng::create_rng;
    use improvisor_spec::chord::{PitchName, Quality};

    fn pitch(name: &str, octave: i32) -> Pitch {
        Pitch::from_name(name.parse::<PitchName>().unwrap(), octave)
    }

    fn triad(root: &str, quality: Quality) -> MelodicCell {
        target_triad(root.parse().unwrap(), quality)
    }

    #[test]
    fn test_half_step_follows_absolute_distance() {
        // C major triad: C E G. F# is one step from G, so it moves down to F
        // even though G lies above it.
        let mut rng = create_rng(1);
        let led = lead(&pitch("F#", 4), &triad("C", Quality::Major), &mut rng).unwrap();
        assert_eq!(led.motion, Motion::HalfStep);
        assert_eq!(led.pitch.midi, 65);
        assert!(!triad("C", Quality::Major)
            .pitches()
            .iter()
            .any(|t| t.pitch_class() == led.pitch.pitch_class()));
    }

    #[test]
    fn test_half_step_down_toward_tone() {
        // Ab is one step above G.
        let mut rng = create_rng(1);
        let led = lead(&pitch("A-", 4), &triad("C", Quality::Major), &mut rng).unwrap();
        assert_eq!(led.motion, Motion::HalfStep);
        assert_eq!(led.pitch.midi, 67);
        assert_eq!(led.pitch.to_string(), "G4");
    }

    #[test]
    fn test_distance_eleven_steps_up() {
        // A dominant sits at A4 C#5 E5. D4 is eleven steps below C#5 and
        // moves up a half step; E5 is fourteen steps away, a whole step.
        let mut rng = create_rng(3);
        let led = lead(&pitch("D", 4), &triad("A", Quality::Dominant), &mut rng).unwrap();
        assert_eq!(led.motion, Motion::HalfStep);
        assert_eq!(led.pitch.midi, 63);
    }

    #[test]
    fn test_whole_step_choices_are_random_between_options() {
        // D2 against C4 E4 G4: C is 22 steps away (10, up) and E is 26 steps
        // away (2, down).
        let mut seen = std::collections::HashSet::new();
        for seed in 0..64 {
            let mut rng = create_rng(seed);
            let led = lead(&pitch("D", 2), &triad("C", Quality::Major), &mut rng).unwrap();
            assert_eq!(led.motion, Motion::WholeStep);
            seen.insert(led.pitch.midi);
        }
        assert_eq!(seen, [36, 40].into_iter().collect());
    }

    #[test]
    fn test_whole_step_below_tone_moves_down() {
        // D4 is two steps below E4 and two above C4; both move down to C4.
        let mut rng = create_rng(5);
        let led = lead(&pitch("D", 4), &triad("C", Quality::Major), &mut rng).unwrap();
        assert_eq!(led.motion, Motion::WholeStep);
        assert_eq!(led.pitch.midi, 60);
    }

    #[test]
    fn test_unison_returns_source() {
        // B against E G# B (E major): G# is a minor third away, E a fourth.
        let mut rng = create_rng(1);
        let source = pitch("B", 3);
        let led = lead(&source, &triad("E", Quality::Major), &mut rng).unwrap();
        assert!(led.is_unison());
        assert_eq!(led.pitch, source);
    }

    #[test]
    fn test_no_leading_found() {
        // Eb and A are a minor third and a major sixth from C.
        let mut rng = create_rng(1);
        let target = MelodicCell::new(vec![pitch("E-", 4), pitch("A", 4)]);
        let result = lead(&pitch("C", 4), &target, &mut rng);
        assert_eq!(result, Err(NoLeadingFound { source_midi: 60 }));
    }
}
