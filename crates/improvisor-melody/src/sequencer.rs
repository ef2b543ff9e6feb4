//! Progression sequencer.
//!
//! Builds one voice-leading target and one candidate pool per chord, then
//! walks the progression chorus by chorus, chaining cells whose first pitch
//! continues the previous cell by step.
//!
//! ```text
//! Idle --seed--> Seeded --step--> Chaining --step...--> Done
//! ```

use improvisor_spec::chord::ChordSymbol;
use improvisor_spec::pattern::{CellPattern, MAX_PATTERN_LEN};
use improvisor_spec::spec::{CandidateMatch, ImprovSpec, RetryPolicy};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::cell::{target_triad, MelodicCell};
use crate::composition::{ComposedCell, Composition, Route};
use crate::error::MelodyError;
use crate::expand::{expand_chord, CandidatePool};
use crate::pitch::Pitch;
use crate::voice_leading::lead;


/// Sequencer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// Pools are built; nothing has been emitted.
    Idle,
    /// The opening cell has been emitted.
    Seeded,
    /// At least one transition has been emitted.
    Chaining,
    /// Every transition has been emitted.
    Done,
}

/// Knobs that change how candidates are matched and pools are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequencerOptions {
    pub candidate_match: CandidateMatch,
    pub retry_policy: RetryPolicy,
    pub deduplicate_candidates: bool,
}

impl SequencerOptions {
    pub fn from_spec(spec: &ImprovSpec) -> Self {
        Self {
            candidate_match: spec.candidate_match,
            retry_policy: spec.retry_policy,
            deduplicate_candidates: spec.deduplicate_candidates,
        }
    }

    fn matches(&self, cell: &MelodicCell, led: &Pitch) -> bool {
        match (cell.first(), self.candidate_match) {
            (Some(first), CandidateMatch::ExactPitch) => first.midi == led.midi,
            (Some(first), CandidateMatch::PitchClass) => first.pitch_class() == led.pitch_class(),
            (None, _) => false,
        }
    }
}

/// Validated inputs turned into per-chord targets and pools.
#[derive(Debug, Clone)]
pub struct PreparedProgression {
    pub chords: Vec<ChordSymbol>,
    pub targets: Vec<MelodicCell>,
    pub pools: Vec<CandidatePool>,
}

impl PreparedProgression {
    /// Checks the inputs and expands the library over every chord.
    pub fn new(
        chords: &[ChordSymbol],
        patterns: &[CellPattern],
        deduplicate: bool,
    ) -> Result<Self, MelodyError> {
        if chords.is_empty() {
            return Err(MelodyError::EmptyProgression);
        }
        if patterns.is_empty() {
            return Err(MelodyError::EmptyPatternLibrary);
        }
        for (index, pattern) in patterns.iter().enumerate() {
            if pattern.is_empty() {
                return Err(MelodyError::EmptyPattern { index });
            }
            if pattern.len() > MAX_PATTERN_LEN {
                return Err(MelodyError::PatternTooLong {
                    index,
                    len: pattern.len(),
                    max: MAX_PATTERN_LEN,
                });
            }
        }

        let targets = chords
            .iter()
            .map(|c| target_triad(c.root, c.quality))
            .collect();

        let mut pools = Vec::with_capacity(chords.len());
        for (chord_index, chord) in chords.iter().enumerate() {
            let mut pool = expand_chord(chord, patterns);
            if deduplicate {
                pool.deduplicate();
            }
            if pool.is_empty() {
                return Err(MelodyError::EmptyCandidatePool {
                    chord_index,
                    chord: chord.to_string(),
                });
            }
            trace!(chord_index, %chord, pool_size = pool.len(), "built candidate pool");
            pools.push(pool);
        }

        Ok(Self {
            chords: chords.to_vec(),
            targets,
            pools,
        })
    }
}

/// Chains candidate cells across a progression.
pub struct Sequencer<R: Rng> {
    prepared: PreparedProgression,
    choruses: u32,
    options: SequencerOptions,
    rng: R,
    state: SequencerState,
    /// Next (chorus, chord index) to emit while chaining.
    cursor: (u32, usize),
    composition: Composition,
}

impl<R: Rng> Sequencer<R> {
    /// Builds targets and pools for every chord.
    pub fn new(
        chords: &[ChordSymbol],
        patterns: &[CellPattern],
        choruses: u32,
        rng: R,
        options: SequencerOptions,
    ) -> Result<Self, MelodyError> {
        if choruses == 0 {
            return Err(MelodyError::ZeroChoruses);
        }
        let prepared = PreparedProgression::new(chords, patterns, options.deduplicate_candidates)?;
        debug!(
            chords = prepared.chords.len(),
            choruses,
            pool_sizes = ?prepared.pools.iter().map(CandidatePool::len).collect::<Vec<_>>(),
            "sequencer ready"
        );
        Ok(Self {
            prepared,
            choruses,
            options,
            rng,
            state: SequencerState::Idle,
            cursor: (0, 1),
            composition: Composition::new(),
        })
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn chords(&self) -> &[ChordSymbol] {
        &self.prepared.chords
    }

    pub fn targets(&self) -> &[MelodicCell] {
        &self.prepared.targets
    }

    pub fn pools(&self) -> &[CandidatePool] {
        &self.prepared.pools
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Number of cells a full run emits: `1 + choruses * (chords - 1)`.
    pub fn expected_len(&self) -> usize {
        1 + self.choruses as usize * (self.prepared.chords.len() - 1)
    }

    /// Emits the next cell, or returns `None` once the run is done.
    pub fn step(&mut self) -> Option<&ComposedCell> {
        match self.state {
            SequencerState::Idle => {
                self.emit_seed();
                self.state = SequencerState::Seeded;
            }
            SequencerState::Seeded | SequencerState::Chaining => {
                if !self.has_transition() {
                    self.state = SequencerState::Done;
                    return None;
                }
                self.emit_transition();
                self.advance_cursor();
                self.state = SequencerState::Chaining;
            }
            SequencerState::Done => return None,
        }
        self.composition.last()
    }

    /// Runs to completion and returns the solo.
    pub fn run(mut self) -> Composition {
        while self.step().is_some() {}
        self.composition
    }

    fn has_transition(&self) -> bool {
        let (chorus, chord_index) = self.cursor;
        chorus < self.choruses && chord_index < self.prepared.chords.len()
    }

    fn advance_cursor(&mut self) {
        let (chorus, chord_index) = self.cursor;
        self.cursor = if chord_index + 1 < self.prepared.chords.len() {
            (chorus, chord_index + 1)
        } else {
            (chorus + 1, 1)
        };
    }

    fn emit_seed(&mut self) {
        let pool = self.prepared.pools[0].cells();
        // pools are never empty after construction
        let Some(cell) = pool.choose(&mut self.rng).cloned() else {
            return;
        };
        self.composition.push(ComposedCell {
            chorus: 0,
            chord_index: 0,
            chord: self.prepared.chords[0],
            route: Route::Seed,
            led_pitch: None,
            cell,
        });
    }

    fn emit_transition(&mut self) {
        let (chorus, chord_index) = self.cursor;
        let Some(current) = self.composition.last().map(|c| c.cell.clone()) else {
            return;
        };
        let (route, led_pitch, cell) = self.choose_next(&current, chord_index);
        self.composition.push(ComposedCell {
            chorus,
            chord_index,
            chord: self.prepared.chords[chord_index],
            route,
            led_pitch,
            cell,
        });
    }

    fn choose_next(
        &mut self,
        current: &MelodicCell,
        chord_index: usize,
    ) -> (Route, Option<Pitch>, MelodicCell) {
        let target = &self.prepared.targets[chord_index];
        let pool = &self.prepared.pools[chord_index];
        let (Some(first), Some(last)) = (current.first().copied(), current.last().copied())
        else {
            return (Route::Repeat, None, current.clone());
        };

        // Lead from the last pitch; a unison or a miss falls back to the first.
        let (route, led) = match lead(&last, target, &mut self.rng) {
            Ok(tone) if !tone.is_unison() => (Route::LastPitch, Some(tone.pitch)),
            _ => match lead(&first, target, &mut self.rng) {
                Ok(tone) => (Route::FirstPitch, Some(tone.pitch)),
                Err(err) => {
                    debug!(
                        chord_index,
                        source = %first,
                        source_midi = err.source_midi,
                        "no leading found from first pitch"
                    );
                    (Route::FirstPitch, None)
                }
            },
        };

        let mut candidates: Vec<(Route, Option<Pitch>, &MelodicCell)> = match led {
            Some(pitch) => pool
                .cells()
                .iter()
                .filter(|cell| self.options.matches(cell, &pitch))
                .map(|cell| (route, led, cell))
                .collect(),
            None => Vec::new(),
        };

        let refilter = match self.options.retry_policy {
            RetryPolicy::OnlyIfEmpty => candidates.is_empty(),
            RetryPolicy::AlwaysRefilter => true,
        };
        if refilter {
            let retry = lead(&first, target, &mut self.rng).ok().map(|t| t.pitch);
            if let Some(pitch) = retry {
                let before = candidates.len();
                candidates.extend(
                    pool.cells()
                        .iter()
                        .filter(|cell| self.options.matches(cell, &pitch))
                        .map(|cell| (Route::Retry, retry, cell)),
                );
                debug!(
                    chord_index,
                    led = %pitch,
                    added = candidates.len() - before,
                    "refiltered candidates from first pitch"
                );
            }
        }

        if let Some((chosen_route, chosen_led, cell)) = candidates.choose(&mut self.rng) {
            return (*chosen_route, *chosen_led, (*cell).clone());
        }

        debug!(
            chord_index,
            chord = %self.prepared.chords[chord_index],
            "no candidate continues the line; repeating current cell"
        );
        (Route::Repeat, led, current.clone())
    }
}
