//! Loading improv specs from a JSON file or from command-line flags.

use std::path::{Path, PathBuf};

use improvisor_spec::spec::NoteValue;
use improvisor_spec::ImprovSpec;
use tracing::debug;

/// Id given to specs built from `--progression` alone.
pub const DEFAULT_FLAG_SPEC_ID: &str = "improvisation";

/// Recognized spec file extensions.
pub const JSON_EXTENSIONS: &[&str] = &["json"];

/// Where a spec came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    File(PathBuf),
    Flags,
}

impl std::fmt::Display for SpecSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecSource::File(path) => write!(f, "{}", path.display()),
            SpecSource::Flags => write!(f, "<command line>"),
        }
    }
}

/// A loaded spec with provenance.
#[derive(Debug)]
pub struct LoadResult {
    pub spec: ImprovSpec,
    pub source: SpecSource,
    /// BLAKE3 hash of the source text (file content or progression string).
    pub source_hash: String,
}

/// Command-line values that replace spec fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecOverrides {
    pub seed: Option<u32>,
    pub choruses: Option<u32>,
    pub tempo_bpm: Option<u16>,
    pub note_value: Option<NoteValue>,
}

impl SpecOverrides {
    pub fn apply(&self, spec: &mut ImprovSpec) {
        if let Some(seed) = self.seed {
            spec.seed = seed;
        }
        if let Some(choruses) = self.choruses {
            spec.choruses = choruses;
        }
        if let Some(tempo) = self.tempo_bpm {
            spec.tempo_bpm = tempo;
        }
        if let Some(note_value) = self.note_value {
            spec.note_value = note_value;
        }
    }
}

/// Errors that can occur during spec loading.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Unknown file extension.
    UnknownExtension { extension: Option<String> },

    /// JSON parsing failed.
    JsonParse { message: String },

    /// Neither a spec file nor a progression was given.
    MissingInput,
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::UnknownExtension { extension } => match extension {
                Some(ext) => write!(f, "unknown file extension '.{}' (expected .json)", ext),
                None => write!(f, "file has no extension (expected .json)"),
            },
            InputError::JsonParse { message } => write!(f, "JSON parse error: {}", message),
            InputError::MissingInput => {
                write!(f, "either --spec or --progression must be given")
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Load a spec from a JSON file.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use improvisor_cli::input::load_spec;
///
/// let result = load_spec(Path::new("solo.json")).unwrap();
/// println!("Loaded {}", result.spec.id);
/// ```
pub fn load_spec(path: &Path) -> Result<LoadResult, InputError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase());
    match extension.as_deref() {
        Some(ext) if JSON_EXTENSIONS.contains(&ext) => {}
        _ => return Err(InputError::UnknownExtension { extension }),
    }

    let content = std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let source_hash = blake3::hash(content.as_bytes()).to_hex().to_string();
    let spec = ImprovSpec::from_json(&content).map_err(|e| InputError::JsonParse {
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), id = %spec.id, source_hash = %source_hash, "loaded spec");

    Ok(LoadResult {
        spec,
        source: SpecSource::File(path.to_path_buf()),
        source_hash,
    })
}

/// Build a spec from a progression string with every other field defaulted.
pub fn spec_from_progression(progression: &str) -> LoadResult {
    let spec = ImprovSpec::builder(DEFAULT_FLAG_SPEC_ID, progression)
        .description("generated from command-line flags")
        .build();
    LoadResult {
        spec,
        source: SpecSource::Flags,
        source_hash: blake3::hash(progression.as_bytes()).to_hex().to_string(),
    }
}

/// Resolve the spec for a command: a file wins over a bare progression, and
/// overrides are applied last.
pub fn resolve_spec(
    spec_path: Option<&str>,
    progression: Option<&str>,
    overrides: &SpecOverrides,
) -> Result<LoadResult, InputError> {
    let mut loaded = match (spec_path, progression) {
        (Some(path), _) => load_spec(Path::new(path))?,
        (None, Some(progression)) => spec_from_progression(progression),
        (None, None) => return Err(InputError::MissingInput),
    };
    overrides.apply(&mut loaded.spec);
    Ok(loaded)
}
