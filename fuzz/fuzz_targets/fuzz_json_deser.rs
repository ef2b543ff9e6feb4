#![no_main]

use improvisor_spec::{validate_spec, ImprovSpec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(spec) = ImprovSpec::from_json(text) {
        let _ = validate_spec(&spec);
        let _ = spec.to_json();
    }
});
