use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crab_age::data::batch::predict_csv_file;
use crab_age::data::pipeline::{explain, PredictionBreakdown};
use crab_age::{load_resources, ArtifactPaths, RawMeasurement, Resources};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Current form values.
    pub form: RawMeasurement,

    /// Where artifacts are read from.
    pub paths: ArtifactPaths,

    /// Loaded scaler/model pair (None until first successful load).
    pub resources: Option<Arc<Resources>>,

    /// Result of the last Predict click.
    pub prediction: Option<PredictionBreakdown>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            form: RawMeasurement::default(),
            paths: ArtifactPaths::from_env(),
            resources: None,
            prediction: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Artifacts for the current paths. The configured paths go through the
    /// process-wide cache; paths picked in the UI are read directly.
    fn resources(&mut self) -> Result<Arc<Resources>> {
        if let Some(res) = &self.resources {
            return Ok(Arc::clone(res));
        }
        let res = if self.paths == ArtifactPaths::from_env() {
            load_resources()?
        } else {
            Arc::new(Resources::load(&self.paths)?)
        };
        self.resources = Some(Arc::clone(&res));
        Ok(res)
    }

    fn report(&mut self, err: anyhow::Error) {
        log::error!("{err:#}");
        self.status_message = Some(format!("Error: {err:#}"));
    }

    /// Try loading artifacts up front so a missing file shows immediately.
    pub fn preload(&mut self) {
        if let Err(e) = self.resources() {
            self.report(e);
        }
    }

    /// Run the pipeline on the current form values.
    pub fn run_prediction(&mut self) {
        let form = self.form;
        let result = self
            .resources()
            .and_then(|res| explain(&form, &res).context("prediction failed"));
        match result {
            Ok(breakdown) => {
                log::info!("Predicted crab age {:.2} months", breakdown.age_months);
                self.prediction = Some(breakdown);
                self.status_message = None;
            }
            Err(e) => {
                self.prediction = None;
                self.report(e);
            }
        }
    }

    /// Point at a different scaler file and reload both artifacts.
    pub fn set_scaler_path(&mut self, path: PathBuf) {
        self.paths.scaler = path;
        self.reload();
    }

    /// Point at a different model file and reload both artifacts.
    pub fn set_model_path(&mut self, path: PathBuf) {
        self.paths.model = path;
        self.reload();
    }

    fn reload(&mut self) {
        self.resources = None;
        self.prediction = None;
        self.status_message = None;
        self.preload();
    }

    /// Predict a whole CSV file into `output`.
    pub fn run_batch(&mut self, input: &Path, output: &Path) {
        let result = self
            .resources()
            .and_then(|res| predict_csv_file(input, output, &res));
        match result {
            Ok(n) => {
                self.status_message = Some(format!("Wrote {n} predictions to {}", output.display()));
            }
            Err(e) => self.report(e),
        }
    }
}
