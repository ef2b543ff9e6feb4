//! Improvisor End-to-End Test Infrastructure
//!
//! Integration tests for the full pipeline:
//!
//! - Generation: spec -> composition -> MIDI bytes
//! - Validation: spec files through the CLI loader and validator
//! - **Determinism**: byte-identical MIDI across runs
//! - Properties: scale, expansion, voice-leading and sequencing laws
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p improvisor-tests
//! ```

pub mod determinism;
pub mod fixtures;

pub use determinism::{compute_hash, verify_determinism, DeterminismResult};
