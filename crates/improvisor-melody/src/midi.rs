//! Standard MIDI File output.
//!
//! Format 1 with two tracks: track 0 carries the tempo and the solo's name,
//! track 1 the melody on channel 1 as back-to-back note on/off pairs.

use improvisor_spec::spec::NoteValue;
use improvisor_spec::BackendError;
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use thiserror::Error;

use crate::composition::{Composition, TICKS_PER_QUARTER};

/// Velocity of every note.
const NOTE_VELOCITY: u8 = 80;

/// Errors from MIDI rendering.
#[derive(Debug, Error)]
pub enum MidiError {
    #[error("note {index} has pitch {midi}, outside the MIDI range 0..=127")]
    PitchOutOfRange { index: usize, midi: i32 },

    #[error("tempo must be positive")]
    InvalidTempo,

    #[error("failed to write MIDI data: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError for MidiError {
    fn code(&self) -> &'static str {
        match self {
            MidiError::PitchOutOfRange { .. } => "MIDI_001",
            MidiError::InvalidTempo => "MIDI_002",
            MidiError::Io(_) => "MIDI_003",
        }
    }

    fn category(&self) -> &'static str {
        "midi"
    }
}

/// Rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiOptions {
    pub tempo_bpm: u16,
    pub note_value: NoteValue,
    /// Written as the name of the tempo track.
    pub title: String,
}

impl Default for MidiOptions {
    fn default() -> Self {
        Self {
            tempo_bpm: improvisor_spec::spec::DEFAULT_TEMPO_BPM,
            note_value: NoteValue::default(),
            title: "improvisor".to_string(),
        }
    }
}

fn meta(delta: u32, message: MetaMessage<'_>) -> TrackEvent<'_> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Meta(message),
    }
}

fn note(delta: u32, key: u8, on: bool) -> TrackEvent<'static> {
    let message = if on {
        MidiMessage::NoteOn {
            key: u7::new(key),
            vel: u7::new(NOTE_VELOCITY),
        }
    } else {
        MidiMessage::NoteOff {
            key: u7::new(key),
            vel: u7::new(0),
        }
    };
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message,
        },
    }
}

/// Renders a composition to SMF bytes.
pub fn render_smf(composition: &Composition, options: &MidiOptions) -> Result<Vec<u8>, MidiError> {
    if options.tempo_bpm == 0 {
        return Err(MidiError::InvalidTempo);
    }

    let events = composition.to_note_events(options.note_value);
    let mut keys = Vec::with_capacity(events.len());
    for (index, event) in events.iter().enumerate() {
        let key = event.pitch.midi_key().ok_or(MidiError::PitchOutOfRange {
            index,
            midi: event.pitch.midi,
        })?;
        keys.push(key);
    }

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER as u16)),
    ));

    let micros_per_quarter = 60_000_000 / u32::from(options.tempo_bpm);
    let tempo_track: Track<'_> = vec![
        meta(0, MetaMessage::TrackName(options.title.as_bytes())),
        meta(0, MetaMessage::Tempo(u24::new(micros_per_quarter))),
        meta(0, MetaMessage::EndOfTrack),
    ];
    smf.tracks.push(tempo_track);

    let mut melody: Track<'_> = Vec::with_capacity(events.len() * 2 + 2);
    melody.push(meta(0, MetaMessage::TrackName(b"Melody")));
    let mut last_tick = 0;
    for (event, key) in events.iter().zip(keys) {
        melody.push(note(event.start_tick - last_tick, key, true));
        melody.push(note(event.duration_ticks, key, false));
        last_tick = event.end_tick();
    }
    melody.push(meta(0, MetaMessage::EndOfTrack));
    smf.tracks.push(melody);

    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use crate::sequencer::{Sequencer, SequencerOptions};
    use improvisor_spec::chord::parse_progression;
    use improvisor_spec::pattern::{default_patterns, CellPattern};

    fn composition(progression: &str, patterns: &[CellPattern]) -> Composition {
        let chords = parse_progression(progression).chords;
        Sequencer::new(
            &chords,
            patterns,
            2,
            create_rng(4),
            SequencerOptions::default(),
        )
        .unwrap()
        .run()
    }

    #[test]
    fn test_smf_structure() {
        let composition = composition("Am,D7,GMaj", &default_patterns());
        let bytes = render_smf(&composition, &MidiOptions::default()).unwrap();
        assert_eq!(&bytes[..4], b"MThd");

        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.header.format, Format::Parallel);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(480)));
        assert_eq!(smf.tracks.len(), 2);

        let note_ons = smf.tracks[1]
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    TrackEventKind::Midi {
                        message: MidiMessage::NoteOn { .. },
                        ..
                    }
                )
            })
            .count();
        assert_eq!(note_ons, composition.note_count());

        let tempo = smf.tracks[0].iter().find_map(|e| match e.kind {
            TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(t.as_int()),
            _ => None,
        });
        assert_eq!(tempo, Some(500_000));
    }

    #[test]
    fn test_note_offs_use_note_value() {
        let composition = composition("Am,D7", &[CellPattern::new(vec![1, 3])]);
        let options = MidiOptions {
            note_value: NoteValue::Quarter,
            ..MidiOptions::default()
        };
        let bytes = render_smf(&composition, &options).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        for event in &smf.tracks[1] {
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOff { .. },
                ..
            } = event.kind
            {
                assert_eq!(event.delta.as_int(), 480);
            }
        }
    }

    #[test]
    fn test_same_composition_same_bytes() {
        let composition = composition("Am,D7,GMaj", &default_patterns());
        let a = render_smf(&composition, &MidiOptions::default()).unwrap();
        let b = render_smf(&composition, &MidiOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_tempo_rejected() {
        let composition = composition("Am,D7", &default_patterns());
        let options = MidiOptions {
            tempo_bpm: 0,
            ..MidiOptions::default()
        };
        let err = render_smf(&composition, &options).unwrap_err();
        assert_eq!(err.code(), "MIDI_002");
    }
}
