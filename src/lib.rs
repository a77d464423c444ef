//! Crab age prediction: feature engineering, min-max scaling and a linear
//! model evaluated over pre-fitted artifacts.

pub mod data;
pub mod error;

pub use data::loader::{load_resources, ArtifactPaths, ResourceCache, Resources};
pub use data::measurement::{RawMeasurement, Sex};
pub use data::pipeline::{explain, predict, PredictionBreakdown};
pub use error::{ArtifactError, PipelineError, ShapeMismatch};
