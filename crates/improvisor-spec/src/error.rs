//! Error types for improv spec validation and processing.

use thiserror::Error;

/// Error codes for improv spec validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: Unsupported spec_version
    UnsupportedSpecVersion,
    /// E002: Invalid id format
    InvalidId,
    /// E003: Progression contains no parseable chord symbols
    EmptyProgression,
    /// E004: Pattern library is empty
    EmptyPatternLibrary,
    /// E005: A pattern has no degrees
    EmptyPattern,
    /// E006: A pattern is longer than the maximum expandable length
    PatternTooLong,
    /// E007: A scale degree is outside the resolvable range
    DegreeOutOfRange,
    /// E008: Chorus count is zero
    ZeroChoruses,
    /// E009: Tempo outside the supported range
    TempoOutOfRange,
    /// E010: Expanded candidate pools exceed the candidate budget
    CandidateBudgetExceeded,
    /// E011: Chorus count exceeds the chorus budget
    TooManyChoruses,
    /// E012: The solo could exceed the note budget
    NoteBudgetExceeded,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::UnsupportedSpecVersion => "E001",
            ErrorCode::InvalidId => "E002",
            ErrorCode::EmptyProgression => "E003",
            ErrorCode::EmptyPatternLibrary => "E004",
            ErrorCode::EmptyPattern => "E005",
            ErrorCode::PatternTooLong => "E006",
            ErrorCode::DegreeOutOfRange => "E007",
            ErrorCode::ZeroChoruses => "E008",
            ErrorCode::TempoOutOfRange => "E009",
            ErrorCode::CandidateBudgetExceeded => "E010",
            ErrorCode::TooManyChoruses => "E011",
            ErrorCode::NoteBudgetExceeded => "E012",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for improv spec validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: One or more chord symbols could not be parsed and were dropped
    DroppedChordSymbol,
    /// W002: Progression has a single chord, so only the opening cell is produced
    SingleChordProgression,
    /// W003: Missing description
    MissingDescription,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::DroppedChordSymbol => "W001",
            WarningCode::SingleChordProgression => "W002",
            WarningCode::MissingDescription => "W003",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic field (e.g., "patterns\[3\]").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// JSON path to the problematic field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation warning with a JSON path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Top-level error type for spec operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Result of spec validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors).
    pub ok: bool,
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.ok = false;
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Returns true if an error with the given code was recorded.
    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Returns true if a warning with the given code was recorded.
    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        if self.ok {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

/// Common trait for backend errors.
///
/// Each backend error type implements this trait so the CLI can report a
/// stable code and category without depending on the concrete error enum.
///
/// # Example
///
/// ```ignore
/// use improvisor_spec::error::BackendError;
///
/// fn handle_error<E: BackendError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting.
    ///
    /// Returns a static string like "MELODY_001" or "MIDI_002". These codes
    /// are stable and can be used for programmatic error handling.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category for grouping related errors.
    fn category(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::UnsupportedSpecVersion.to_string(), "E001");
        assert_eq!(ErrorCode::TempoOutOfRange.to_string(), "E009");
        assert_eq!(ErrorCode::CandidateBudgetExceeded.to_string(), "E010");
        assert_eq!(ErrorCode::NoteBudgetExceeded.to_string(), "E012");
        assert_eq!(WarningCode::DroppedChordSymbol.to_string(), "W001");
    }

    #[test]
    fn test_validation_error_display_with_path() {
        let err = ValidationError::with_path(
            ErrorCode::EmptyPattern,
            "pattern must contain at least one degree",
            "patterns[2]",
        );
        assert_eq!(
            err.to_string(),
            "E005: pattern must contain at least one degree (at patterns[2])"
        );
    }

    #[test]
    fn test_validation_result_tracks_errors() {
        let mut result = ValidationResult::default();
        assert!(result.is_ok());

        result.add_warning(ValidationWarning::new(
            WarningCode::MissingDescription,
            "no description",
        ));
        assert!(result.is_ok());

        result.add_error(ValidationError::new(ErrorCode::ZeroChoruses, "choruses is 0"));
        assert!(!result.is_ok());
        assert!(result.has_error(ErrorCode::ZeroChoruses));
        assert!(result.has_warning(WarningCode::MissingDescription));
        assert_eq!(result.into_result().unwrap_err().len(), 1);
    }
}
