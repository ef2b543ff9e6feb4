//! Spec fixtures shared by the integration tests.

use std::fs;
use std::path::PathBuf;

use improvisor_spec::{ImprovSpec, GIANT_STEPS};
use tempfile::TempDir;

/// ii-V-I in G.
pub const TWO_FIVE_ONE: &str = "Am,D7,GMaj";

/// A minor ii to the dominant, the smallest two-chord form.
pub const MINOR_TWO_FIVE: &str = "Am,D7";

/// The Giant Steps changes with a fixed seed.
pub fn giant_steps_spec(seed: u32, choruses: u32) -> ImprovSpec {
    ImprovSpec::builder("giant-steps", GIANT_STEPS)
        .seed(seed)
        .choruses(choruses)
        .description("Coltrane changes")
        .build()
}

/// A short spec over `progression`.
pub fn short_spec(progression: &str, seed: u32) -> ImprovSpec {
    ImprovSpec::builder("fixture-solo", progression)
        .seed(seed)
        .choruses(2)
        .description("fixture")
        .build()
}

/// A temp directory holding spec files.
pub struct SpecDir {
    pub root: TempDir,
}

impl SpecDir {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Writes a spec as `{name}.json`.
    pub fn add_spec(&self, name: &str, spec: &ImprovSpec) -> PathBuf {
        let json = spec.to_json_pretty().expect("Failed to serialize spec");
        self.add_raw(name, &json)
    }

    /// Writes raw text as `{name}.json`.
    pub fn add_raw(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(format!("{}.json", name));
        fs::write(&path, content).expect("Failed to write spec file");
        path
    }

    /// Path for an output file inside the directory.
    pub fn out_path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }
}

impl Default for SpecDir {
    fn default() -> Self {
        Self::new()
    }
}
