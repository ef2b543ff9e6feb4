//! Improvisor spec library
//!
//! Types, validation, and hashing for improv specs: JSON documents that
//! describe one generated solo over a chord progression.
//!
//! # Example
//!
//! ```
//! use improvisor_spec::ImprovSpec;
//! use improvisor_spec::validation::validate_spec;
//! use improvisor_spec::hash::canonical_spec_hash;
//!
//! let spec = ImprovSpec::builder("giant-steps-01", improvisor_spec::GIANT_STEPS)
//!     .seed(42)
//!     .choruses(3)
//!     .description("Coltrane changes, three choruses")
//!     .build();
//!
//! let result = validate_spec(&spec);
//! assert!(result.is_ok());
//!
//! let hash = canonical_spec_hash(&spec).unwrap();
//! println!("Spec hash: {}", hash);
//! ```
//!
//! # Modules
//!
//! - [`budgets`]: Resource limits checked during validation
//! - [`chord`]: Chord symbol parsing (`"D-Maj,E7,AMaj"`)
//! - [`error`]: Error and warning types for validation
//! - [`pattern`]: Cell patterns and the built-in pattern library
//! - [`spec`]: Main spec type and builder
//! - [`validation`]: Spec validation functions
//! - [`hash`]: Canonical hashing and seed derivation

pub mod budgets;
pub mod chord;
pub mod error;
pub mod hash;
pub mod pattern;
pub mod spec;
pub mod validation;

pub use budgets::GenerationBudget;
pub use chord::{
    parse_chord_symbol, parse_progression, ChordParseError, ChordSymbol, Letter, ParsedProgression,
    PitchName, Quality, RejectedSymbol,
};
pub use error::{
    BackendError, ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use hash::{canonical_spec_hash, derive_melody_seed};
pub use pattern::{default_patterns, CellPattern, MAX_PATTERN_LEN};
pub use spec::{
    CandidateMatch, ImprovSpec, ImprovSpecBuilder, NoteValue, RetryPolicy, SPEC_VERSION,
};
pub use validation::validate_spec;

/// The changes of "Giant Steps", 31 chords.
pub const GIANT_STEPS: &str = "D-Maj,E7,AMaj,C7,FMaj,FMaj,Bm,E7,AMaj,C7,FMaj,A-7,D-Maj,D-Maj,Gm,C7,FMaj,FMaj,Bm,E7,AMaj,E-m,A-7,D-Maj,D-Maj,Gm,C7,FMaj,FMaj,E-m,A-7";
