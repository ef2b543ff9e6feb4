//! JSON output types for machine-readable CLI output.
//!
//! The `--json` flag on `generate`, `validate` and `pools` prints one of
//! these records instead of colored text.

use std::collections::BTreeMap;

use improvisor_melody::composition::Composition;
use improvisor_spec::{ValidationError, ValidationWarning};
use serde::{Deserialize, Serialize};

use crate::input::InputError;

/// Error codes for CLI operations.
///
/// Validation codes (E001...) pass through unchanged.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Unknown file extension
    pub const UNKNOWN_EXTENSION: &str = "CLI_002";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_003";
    /// Neither --spec nor --progression given
    pub const MISSING_INPUT: &str = "CLI_004";
    /// Output file could not be written
    pub const FILE_WRITE: &str = "CLI_005";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "E001", "MELODY_002")
    pub code: String,
    pub message: String,
    /// JSON path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// JSON output for the `validate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    /// Canonical spec hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_hash: Option<String>,
    /// BLAKE3 hash of the source file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

/// JSON output for the `generate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerateRecord>,
}

/// Details of a successful generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRecord {
    pub id: String,
    pub seed: u32,
    pub choruses: u32,
    pub spec_hash: String,
    /// BLAKE3 hash of the MIDI bytes
    pub midi_hash: String,
    pub output_path: String,
    pub midi_bytes: usize,
    pub chords: Vec<String>,
    pub cell_count: usize,
    pub note_count: usize,
    /// Cells reached through each voice-leading route.
    pub routes: BTreeMap<String, usize>,
    pub cells: Vec<CellRecord>,
    pub duration_ms: u64,
}

/// One composed cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellRecord {
    /// One-based chorus number
    pub chorus: u32,
    pub chord: String,
    pub route: String,
    pub pitches: Vec<String>,
    pub midi: Vec<i32>,
}

/// JSON output for the `pools` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolsOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    pub chords: Vec<PoolRecord>,
}

/// Targets and pool size for one chord.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolRecord {
    pub index: usize,
    pub chord: String,
    pub mode: String,
    pub scale: Vec<String>,
    pub target: Vec<String>,
    pub pool_size: usize,
}

impl ValidateOutput {
    pub fn success(spec_hash: String, source_hash: String, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            spec_hash: Some(spec_hash),
            source_hash: Some(source_hash),
        }
    }

    pub fn failure(
        errors: Vec<JsonError>,
        warnings: Vec<JsonWarning>,
        spec_hash: Option<String>,
        source_hash: Option<String>,
    ) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            spec_hash,
            source_hash,
        }
    }
}

impl GenerateOutput {
    pub fn success(result: GenerateRecord, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            result: Some(result),
        }
    }

    pub fn failure(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            result: None,
        }
    }
}

impl PoolsOutput {
    pub fn success(chords: Vec<PoolRecord>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            chords,
        }
    }

    pub fn failure(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            chords: Vec::new(),
        }
    }
}

/// Converts an input error to a JSON error.
pub fn input_error_to_json(err: &InputError, file: Option<&str>) -> JsonError {
    let code = match err {
        InputError::FileRead { .. } => error_codes::FILE_READ,
        InputError::UnknownExtension { .. } => error_codes::UNKNOWN_EXTENSION,
        InputError::JsonParse { .. } => error_codes::JSON_PARSE,
        InputError::MissingInput => error_codes::MISSING_INPUT,
    };
    let error = JsonError::new(code, err.to_string());
    match file {
        Some(f) => error.with_file(f),
        None => error,
    }
}

pub fn validation_error_to_json(err: &ValidationError) -> JsonError {
    let error = JsonError::new(err.code.code(), &err.message);
    match &err.path {
        Some(path) => error.with_path(path),
        None => error,
    }
}

pub fn validation_warning_to_json(warning: &ValidationWarning) -> JsonWarning {
    let json = JsonWarning::new(warning.code.code(), &warning.message);
    match &warning.path {
        Some(path) => json.with_path(path),
        None => json,
    }
}

/// Flattens a composition into cell records.
pub fn composition_to_json(composition: &Composition) -> Vec<CellRecord> {
    composition
        .cells()
        .iter()
        .map(|c| CellRecord {
            chorus: c.chorus + 1,
            chord: c.chord.to_string(),
            route: c.route.as_str().to_string(),
            pitches: c.cell.pitches().iter().map(|p| p.to_string()).collect(),
            midi: c.cell.midi(),
        })
        .collect()
}

/// Prints a record as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use improvisor_spec::{ErrorCode, WarningCode};

    #[test]
    fn test_validation_error_conversion() {
        let err = ValidationError::with_path(ErrorCode::ZeroChoruses, "choruses is 0", "choruses");
        let json = validation_error_to_json(&err);
        assert_eq!(json.code, "E008");
        assert_eq!(json.path.as_deref(), Some("choruses"));
    }

    #[test]
    fn test_warning_conversion_skips_empty_path() {
        let warning = ValidationWarning::new(WarningCode::MissingDescription, "no description");
        let json = validation_warning_to_json(&warning);
        let text = serde_json::to_string(&json).unwrap();
        assert_eq!(text, r#"{"code":"W003","message":"no description"}"#);
    }

    #[test]
    fn test_input_error_codes() {
        let json = input_error_to_json(&InputError::MissingInput, None);
        assert_eq!(json.code, error_codes::MISSING_INPUT);
        let json = input_error_to_json(
            &InputError::JsonParse {
                message: "bad".to_string(),
            },
            Some("solo.json"),
        );
        assert_eq!(json.code, error_codes::JSON_PARSE);
        assert_eq!(json.file.as_deref(), Some("solo.json"));
    }
}
