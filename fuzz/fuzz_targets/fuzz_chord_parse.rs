#![no_main]

use improvisor_spec::parse_progression;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let parsed = parse_progression(text);
    assert_eq!(
        parsed.chords.len() + parsed.rejected.len(),
        text.split(',').count()
    );
});
