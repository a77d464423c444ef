use std::path::PathBuf;

use thiserror::Error;

/// A vector whose length or column order does not match what the artifacts
/// were fitted on.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{what}: expected {expected}, found {found}")]
pub struct ShapeMismatch {
    pub what: String,
    pub expected: String,
    pub found: String,
}

impl ShapeMismatch {
    pub fn len(what: &str, expected: usize, found: usize) -> Self {
        Self {
            what: what.to_string(),
            expected: format!("{expected} values"),
            found: format!("{found} values"),
        }
    }
}

/// Failure to load a scaler or model artifact. Always fatal.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact {path} has unsupported format_version {found}")]
    UnsupportedVersion { path: PathBuf, found: u32 },

    #[error("artifact {path} does not match the feature layout: {mismatch}")]
    Shape {
        path: PathBuf,
        #[source]
        mismatch: ShapeMismatch,
    },
}

/// Errors raised while turning a measurement into a prediction.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    NumericDomain { field: &'static str, value: f64 },

    #[error("feature vector shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeMismatch),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
