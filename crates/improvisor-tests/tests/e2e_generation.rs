//! End-to-end generation tests: spec -> composition -> MIDI.

use improvisor_cli::commands::generate::{self, GenerateArgs};
use improvisor_cli::input::SpecOverrides;
use improvisor_melody::cell::target_triad;
use improvisor_melody::generate::generate_melody;
use improvisor_melody::sequencer::PreparedProgression;
use improvisor_melody::{Route, TICKS_PER_QUARTER};
use improvisor_spec::pattern::CellPattern;
use improvisor_spec::spec::NoteValue;
use improvisor_spec::{default_patterns, ImprovSpec};
use improvisor_tests::fixtures::{giant_steps_spec, short_spec, SpecDir, MINOR_TWO_FIVE, TWO_FIVE_ONE};
use midly::{MidiMessage, Smf, TrackEventKind};
use pretty_assertions::assert_eq;
use std::process::ExitCode;

fn note_on_count(bytes: &[u8]) -> usize {
    let smf = Smf::parse(bytes).expect("MIDI should parse");
    smf.tracks
        .iter()
        .flatten()
        .filter(|event| {
            matches!(
                event.kind,
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { vel, .. },
                    ..
                } if vel.as_int() > 0
            )
        })
        .count()
}

#[test]
fn giant_steps_form_and_midi() {
    let spec = giant_steps_spec(42, 5);
    let result = generate_melody(&spec).unwrap();

    assert_eq!(result.chords.len(), 31);
    assert!(result.rejected.is_empty());
    assert_eq!(result.composition.len(), 1 + 5 * 30);
    assert_eq!(result.composition.note_count(), 4 * result.composition.len());
    assert_eq!(note_on_count(&result.midi), result.composition.note_count());

    let smf = Smf::parse(&result.midi).unwrap();
    assert_eq!(smf.tracks.len(), 2);
    assert_eq!(
        smf.header.timing,
        midly::Timing::Metrical(midly::num::u15::new(TICKS_PER_QUARTER as u16))
    );
}

#[test]
fn minor_two_five_pools_and_targets() {
    let chords = ImprovSpec::builder("pools", MINOR_TWO_FIVE)
        .build()
        .parsed_progression()
        .chords;
    let prepared =
        PreparedProgression::new(&chords, &[CellPattern::new(vec![1, 2, 3, 5])], false).unwrap();

    assert_eq!(prepared.pools[0].len(), 192);
    assert_eq!(prepared.pools[1].len(), 192);
    assert_eq!(prepared.targets[0].midi(), vec![69, 72, 76]);
    assert_eq!(prepared.targets[1].midi(), vec![62, 66, 69]);
}

#[test]
fn every_transition_follows_linkage_rules() {
    let spec = giant_steps_spec(7, 3);
    let result = generate_melody(&spec).unwrap();
    let cells = result.composition.cells();
    let prepared = PreparedProgression::new(&result.chords, &default_patterns(), false).unwrap();

    assert_eq!(cells[0].route, Route::Seed);
    assert!(prepared.pools[0].cells().contains(&cells[0].cell));

    let n = result.chords.len();
    for pair in cells.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        // Every chorus after the first restarts on the second chord.
        let expected_index = if prev.chord_index + 1 < n {
            prev.chord_index + 1
        } else {
            1
        };
        assert_eq!(next.chord_index, expected_index);
        if next.route == Route::Repeat {
            assert_eq!(next.cell, prev.cell);
            continue;
        }

        let led = next.led_pitch.expect("non-repeat cells carry a led pitch");
        assert_eq!(next.cell.first().unwrap().midi, led.midi);
        assert!(prepared.pools[next.chord_index].cells().contains(&next.cell));

        let source = match next.route {
            Route::LastPitch => prev.cell.last().unwrap(),
            _ => prev.cell.first().unwrap(),
        };
        assert!((led.midi - source.midi).abs() <= 2);

        // Distances of 1 and 2 move down; 11 and 10 move up.
        let chord = &result.chords[next.chord_index];
        let target = target_triad(chord.root, chord.quality);
        let allowed: Vec<i32> = target
            .pitches()
            .iter()
            .filter_map(|t| match (source.midi - t.midi).abs() % 12 {
                0 => Some(source.midi),
                1 => Some(source.midi - 1),
                2 => Some(source.midi - 2),
                10 => Some(source.midi + 2),
                11 => Some(source.midi + 1),
                _ => None,
            })
            .collect();
        assert!(
            allowed.contains(&led.midi),
            "led {} from {} not in {:?}",
            led,
            source,
            allowed
        );
    }
}

#[test]
fn dropped_symbols_still_generate() {
    let spec = short_spec("Am,Xq,D7,GMaj", 3);
    let result = generate_melody(&spec).unwrap();
    assert_eq!(result.chords.len(), 3);
    assert_eq!(result.rejected.len(), 1);
    assert_eq!(result.rejected[0].index, 1);
    assert_eq!(result.composition.len(), 1 + 2 * 2);
}

#[test]
fn single_chord_yields_seed_only() {
    let spec = short_spec("CMaj", 3);
    let result = generate_melody(&spec).unwrap();
    assert_eq!(result.composition.len(), 1);
    assert_eq!(note_on_count(&result.midi), 4);
}

#[test]
fn note_value_scales_duration() {
    let eighth = generate_melody(&short_spec(TWO_FIVE_ONE, 1)).unwrap();
    let mut spec = short_spec(TWO_FIVE_ONE, 1);
    spec.note_value = NoteValue::Quarter;
    let quarter = generate_melody(&spec).unwrap();

    assert_eq!(eighth.composition, quarter.composition);
    assert_eq!(
        quarter.composition.total_ticks(NoteValue::Quarter),
        2 * eighth.composition.total_ticks(NoteValue::Eighth)
    );
    assert_ne!(eighth.hash, quarter.hash);
}

#[test]
fn cli_generate_writes_spec_file_output() {
    let dir = SpecDir::new();
    let spec_path = dir.add_spec("solo", &short_spec(TWO_FIVE_ONE, 11));
    let out = dir.out_path("solo.mid");
    let spec_str = spec_path.to_str().unwrap().to_string();
    let out_str = out.to_str().unwrap().to_string();

    let args = GenerateArgs {
        spec_path: Some(&spec_str),
        out: Some(&out_str),
        ..Default::default()
    };
    assert_eq!(generate::run(&args, true).unwrap(), ExitCode::SUCCESS);

    let written = std::fs::read(&out).unwrap();
    let direct = generate_melody(&short_spec(TWO_FIVE_ONE, 11)).unwrap();
    assert_eq!(written, direct.midi);
}

#[test]
fn cli_overrides_change_the_solo() {
    let dir = SpecDir::new();
    let spec_path = dir.add_spec("solo", &short_spec(TWO_FIVE_ONE, 11));
    let out = dir.out_path("override.mid");
    let spec_str = spec_path.to_str().unwrap().to_string();
    let out_str = out.to_str().unwrap().to_string();

    let args = GenerateArgs {
        spec_path: Some(&spec_str),
        overrides: SpecOverrides {
            choruses: Some(4),
            ..Default::default()
        },
        out: Some(&out_str),
        ..Default::default()
    };
    assert_eq!(generate::run(&args, true).unwrap(), ExitCode::SUCCESS);
    assert_eq!(note_on_count(&std::fs::read(&out).unwrap()), 4 * (1 + 4 * 2));
}
