use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::artifacts::{Artifact, LinearModel, MinMaxScaler, FORMAT_VERSION};
use crate::error::ArtifactError;

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

pub const DEFAULT_SCALER_PATH: &str = "encoders_scalers/min-max-scaler.json";
pub const DEFAULT_MODEL_PATH: &str = "models_cache/linear-regression.json";

pub const SCALER_PATH_ENV: &str = "CRAB_AGE_SCALER_PATH";
pub const MODEL_PATH_ENV: &str = "CRAB_AGE_MODEL_PATH";

/// Where the two artifacts live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub model: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            scaler: PathBuf::from(DEFAULT_SCALER_PATH),
            model: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

impl ArtifactPaths {
    /// Defaults, overridden by `CRAB_AGE_SCALER_PATH` / `CRAB_AGE_MODEL_PATH`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            scaler: std::env::var_os(SCALER_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.scaler),
            model: std::env::var_os(MODEL_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.model),
        }
    }
}

// ---------------------------------------------------------------------------
// Single artifact
// ---------------------------------------------------------------------------

/// Read, parse and validate one artifact file.
pub fn load_artifact<T: Artifact>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: T = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if artifact.format_version() != FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: artifact.format_version(),
        });
    }
    artifact.validate().map_err(|mismatch| ArtifactError::Shape {
        path: path.to_path_buf(),
        mismatch,
    })?;

    log::info!("Loaded {} from {}", T::KIND, path.display());
    Ok(artifact)
}

// ---------------------------------------------------------------------------
// Resources – the scaler/model pair
// ---------------------------------------------------------------------------

/// Both fitted artifacts, shared read-only once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Resources {
    pub scaler: MinMaxScaler,
    pub model: LinearModel,
}

impl Resources {
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        Ok(Self {
            scaler: load_artifact(&paths.scaler)?,
            model: load_artifact(&paths.model)?,
        })
    }
}

/// Lazily loaded [`Resources`], read from disk at most once.
///
/// The first successful load is kept for the lifetime of the cache and
/// never refreshed; a failed load leaves the cache empty.
#[derive(Debug, Default)]
pub struct ResourceCache {
    slot: Mutex<Option<Arc<Resources>>>,
}

impl ResourceCache {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the cached pair, loading it from `paths` on first use.
    /// The lock is held during the load so concurrent callers never read
    /// the files twice.
    pub fn get_or_load(&self, paths: &ArtifactPaths) -> Result<Arc<Resources>, ArtifactError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(resources) = slot.as_ref() {
            log::debug!("Artifact cache hit");
            return Ok(Arc::clone(resources));
        }

        let resources = Arc::new(Resources::load(paths)?);
        *slot = Some(Arc::clone(&resources));
        Ok(resources)
    }

    pub fn is_loaded(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

static RESOURCES: ResourceCache = ResourceCache::new();

/// Process-wide artifacts from [`ArtifactPaths::from_env`], loaded on first
/// call and cached thereafter.
pub fn load_resources() -> Result<Arc<Resources>, ArtifactError> {
    RESOURCES.get_or_load(&ArtifactPaths::from_env())
}
