//! The generated solo and its timed note events.

use improvisor_spec::chord::ChordSymbol;
use improvisor_spec::spec::NoteValue;
use serde::Serialize;

use crate::cell::MelodicCell;
use crate::pitch::Pitch;

/// MIDI resolution used for every rendered solo.
pub const TICKS_PER_QUARTER: u32 = 480;

/// How the sequencer arrived at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Opening cell, drawn from the first chord's pool.
    Seed,
    /// Matched the lead from the previous cell's last pitch.
    LastPitch,
    /// Matched the lead from the previous cell's first pitch.
    FirstPitch,
    /// Matched the second first-pitch lead.
    Retry,
    /// Nothing matched; the previous cell was repeated.
    Repeat,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Seed => "seed",
            Route::LastPitch => "last",
            Route::FirstPitch => "first",
            Route::Retry => "retry",
            Route::Repeat => "repeat",
        }
    }
}

/// One cell of the solo with where it sits in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedCell {
    /// Zero-based chorus number.
    pub chorus: u32,
    /// Index of the chord within the progression.
    pub chord_index: usize,
    pub chord: ChordSymbol,
    pub route: Route,
    /// The voice-led pitch the cell was matched against, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led_pitch: Option<Pitch>,
    pub cell: MelodicCell,
}

/// A pitch placed in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoteEvent {
    pub pitch: Pitch,
    pub start_tick: u32,
    pub duration_ticks: u32,
}

impl NoteEvent {
    pub fn end_tick(&self) -> u32 {
        self.start_tick.saturating_add(self.duration_ticks)
    }
}

/// The ordered output of a sequencer run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Composition {
    cells: Vec<ComposedCell>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, cell: ComposedCell) {
        self.cells.push(cell);
    }

    pub fn cells(&self) -> &[ComposedCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn last(&self) -> Option<&ComposedCell> {
        self.cells.last()
    }

    /// Every pitch of the solo in playing order.
    pub fn pitches(&self) -> impl Iterator<Item = &Pitch> {
        self.cells.iter().flat_map(|c| c.cell.pitches())
    }

    pub fn note_count(&self) -> usize {
        self.cells.iter().map(|c| c.cell.len()).sum()
    }

    /// Number of cells reached through each route, in [`Route`] order.
    pub fn route_counts(&self) -> [(Route, usize); 5] {
        let mut counts = [
            (Route::Seed, 0),
            (Route::LastPitch, 0),
            (Route::FirstPitch, 0),
            (Route::Retry, 0),
            (Route::Repeat, 0),
        ];
        for cell in &self.cells {
            if let Some(entry) = counts.iter_mut().find(|(route, _)| *route == cell.route) {
                entry.1 += 1;
            }
        }
        counts
    }

    /// Lays the pitches end to end, each lasting `note_value`.
    pub fn to_note_events(&self, note_value: NoteValue) -> Vec<NoteEvent> {
        let duration = note_value.ticks(TICKS_PER_QUARTER);
        self.pitches()
            .enumerate()
            .map(|(i, pitch)| NoteEvent {
                pitch: *pitch,
                start_tick: ticks_for(i, duration),
                duration_ticks: duration,
            })
            .collect()
    }

    /// Length of the solo in ticks.
    pub fn total_ticks(&self, note_value: NoteValue) -> u32 {
        ticks_for(self.note_count(), note_value.ticks(TICKS_PER_QUARTER))
    }
}

/// Ticks spanned by `notes` notes of `duration` each, saturating at
/// `u32::MAX`.
fn ticks_for(notes: usize, duration: u32) -> u32 {
    u32::try_from(notes)
        .unwrap_or(u32::MAX)
        .saturating_mul(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::build_cell;
    use improvisor_spec::chord::parse_chord_symbol;

    fn composed(route: Route, degrees: &[i32]) -> ComposedCell {
        let chord = parse_chord_symbol("Am").unwrap();
        ComposedCell {
            chorus: 0,
            chord_index: 0,
            chord,
            route,
            led_pitch: None,
            cell: build_cell(degrees, chord.root, chord.quality),
        }
    }

    #[test]
    fn test_note_events_are_contiguous_eighths() {
        let mut composition = Composition::new();
        composition.push(composed(Route::Seed, &[1, 2, 3, 5]));
        composition.push(composed(Route::Repeat, &[1, 2]));

        let events = composition.to_note_events(NoteValue::Eighth);
        assert_eq!(events.len(), 6);
        assert_eq!(events[0].start_tick, 0);
        assert_eq!(events[0].duration_ticks, 240);
        assert!(events.windows(2).all(|w| w[0].end_tick() == w[1].start_tick));
        assert_eq!(composition.total_ticks(NoteValue::Eighth), 6 * 240);
        assert_eq!(events[4].pitch.midi, 69);
    }

    #[test]
    fn test_tick_math_saturates() {
        assert_eq!(ticks_for(3, 240), 720);
        assert_eq!(ticks_for(20_000_000, 1920), u32::MAX);
        assert_eq!(ticks_for(usize::MAX, 1), u32::MAX);

        let event = NoteEvent {
            pitch: composed(Route::Seed, &[1]).cell.pitches()[0],
            start_tick: u32::MAX - 10,
            duration_ticks: 240,
        };
        assert_eq!(event.end_tick(), u32::MAX);
    }

    #[test]
    fn test_route_counts() {
        let mut composition = Composition::new();
        composition.push(composed(Route::Seed, &[1]));
        composition.push(composed(Route::Repeat, &[1]));
        composition.push(composed(Route::Repeat, &[1]));

        let counts = composition.route_counts();
        assert_eq!(counts[0], (Route::Seed, 1));
        assert_eq!(counts[4], (Route::Repeat, 2));
        assert_eq!(composition.note_count(), 3);
    }
}
