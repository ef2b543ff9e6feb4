//! Canonical hashing and seed derivation.
//!
//! - Spec canonicalization in the RFC 8785 (JCS) style
//! - BLAKE3 hashing for spec and output hashes
//! - Seed derivation for the melody random stream

use crate::error::SpecError;
use crate::spec::ImprovSpec;

/// Salt mixed into the seed for the melody random stream.
pub const MELODY_SEED_SALT: &str = "melody";

/// Computes the canonical BLAKE3 hash of a spec.
///
/// ```text
/// spec_hash = hex(BLAKE3(JCS(spec_json)))
/// ```
///
/// Defaulted fields are serialized, so a spec that spells out a default and
/// one that omits it hash identically.
///
/// # Example
/// ```
/// use improvisor_spec::ImprovSpec;
/// use improvisor_spec::hash::canonical_spec_hash;
///
/// let spec = ImprovSpec::builder("test-01", "Am,D7").seed(42).build();
///
/// let hash = canonical_spec_hash(&spec).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_spec_hash(spec: &ImprovSpec) -> Result<String, SpecError> {
    let value = spec.to_value()?;
    Ok(canonical_value_hash(&value))
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &serde_json::Value) -> String {
    blake3_hash(canonicalize_json(value).as_bytes())
}

/// Hex BLAKE3 hash of raw bytes (used for rendered MIDI output).
pub fn blake3_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Canonicalizes a JSON value: object keys sorted, no whitespace between
/// tokens, minimal string escaping.
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &serde_json::Value, out: &mut String) {
    match value {
        serde_json::Value::Null => out.push_str("null"),
        serde_json::Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        serde_json::Value::Number(n) => out.push_str(&format_number(n)),
        serde_json::Value::String(s) => write_string(s, out),
        serde_json::Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        serde_json::Value::Object(obj) => {
            let mut entries: Vec<_> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", f as i64)
            } else {
                format!("{}", f)
            }
        }
        _ => "null".to_string(),
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Derives the seed of a named random stream from the spec seed.
///
/// ```text
/// stream_seed = truncate_u32(BLAKE3(base_seed_le || salt))
/// ```
pub fn derive_stream_seed(base_seed: u32, salt: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + salt.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(salt.as_bytes());

    let hash = blake3::hash(&input);
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Derives the seed of the melody random stream.
///
/// # Example
/// ```
/// use improvisor_spec::hash::derive_melody_seed;
///
/// assert_eq!(derive_melody_seed(42), derive_melody_seed(42));
/// assert_ne!(derive_melody_seed(42), derive_melody_seed(43));
/// ```
pub fn derive_melody_seed(base_seed: u32) -> u32 {
    derive_stream_seed(base_seed, MELODY_SEED_SALT)
}
