use serde::{Deserialize, Serialize};

use super::features::{FEATURE_COUNT, FEATURE_NAMES, SCALED_FEATURE_COUNT};
use crate::error::ShapeMismatch;

/// Schema version written by the artifact generator and accepted by the loader.
pub const FORMAT_VERSION: u32 = 1;

/// Implemented by every artifact so the loader can check it after parsing.
pub trait Artifact: for<'de> Deserialize<'de> {
    const KIND: &'static str;

    fn format_version(&self) -> u32;

    /// Check that the artifact lines up with the pipeline's column layout.
    fn validate(&self) -> Result<(), ShapeMismatch>;
}

fn check_names(what: &str, expected: &[&str], found: &[String]) -> Result<(), ShapeMismatch> {
    if expected.len() != found.len() {
        return Err(ShapeMismatch::len(what, expected.len(), found.len()));
    }
    if let Some(i) = expected.iter().zip(found).position(|(e, f)| e != f) {
        return Err(ShapeMismatch {
            what: format!("{what}[{i}]"),
            expected: expected[i].to_string(),
            found: found[i].clone(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MinMaxScaler
// ---------------------------------------------------------------------------

/// Per-column min-max transform fitted offline.
///
/// ```json
/// {
///   "format_version": 1,
///   "feature_names": ["length", "diameter", ...],
///   "data_min": [0.1875, 0.1375, ...],
///   "data_max": [2.0375, 1.625, ...]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
}

impl MinMaxScaler {
    /// Fit on rows of the scaled columns.
    pub fn fit(rows: &[[f64; SCALED_FEATURE_COUNT]]) -> Self {
        let mut data_min = vec![f64::INFINITY; SCALED_FEATURE_COUNT];
        let mut data_max = vec![f64::NEG_INFINITY; SCALED_FEATURE_COUNT];
        for row in rows {
            for (j, &v) in row.iter().enumerate() {
                data_min[j] = data_min[j].min(v);
                data_max[j] = data_max[j].max(v);
            }
        }
        Self {
            format_version: FORMAT_VERSION,
            feature_names: FEATURE_NAMES[..SCALED_FEATURE_COUNT]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            data_min,
            data_max,
        }
    }

    /// `(x - min) / (max - min)` per column. Out-of-range inputs extrapolate;
    /// a constant column (zero range) is divided by 1.
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ShapeMismatch> {
        if values.len() != self.data_min.len() {
            return Err(ShapeMismatch::len(
                "scaler input",
                self.data_min.len(),
                values.len(),
            ));
        }
        Ok(values
            .iter()
            .zip(self.data_min.iter().zip(&self.data_max))
            .map(|(&x, (&min, &max))| {
                let range = max - min;
                let range = if range == 0.0 { 1.0 } else { range };
                (x - min) / range
            })
            .collect())
    }
}

impl Artifact for MinMaxScaler {
    const KIND: &'static str = "min-max scaler";

    fn format_version(&self) -> u32 {
        self.format_version
    }

    fn validate(&self) -> Result<(), ShapeMismatch> {
        check_names(
            "scaler feature_names",
            &FEATURE_NAMES[..SCALED_FEATURE_COUNT],
            &self.feature_names,
        )?;
        if self.data_min.len() != SCALED_FEATURE_COUNT {
            return Err(ShapeMismatch::len(
                "scaler data_min",
                SCALED_FEATURE_COUNT,
                self.data_min.len(),
            ));
        }
        if self.data_max.len() != SCALED_FEATURE_COUNT {
            return Err(ShapeMismatch::len(
                "scaler data_max",
                SCALED_FEATURE_COUNT,
                self.data_max.len(),
            ));
        }
        for (j, (&min, &max)) in self.data_min.iter().zip(&self.data_max).enumerate() {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(ShapeMismatch {
                    what: format!("scaler bounds[{j}]"),
                    expected: "finite data_min <= data_max".to_string(),
                    found: format!("data_min {min}, data_max {max}"),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LinearModel
// ---------------------------------------------------------------------------

/// Ordinary linear regression over the full feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients,
            intercept,
        }
    }

    /// Per-column `coefficient · x`, in feature order.
    pub fn contributions(&self, features: &[f64]) -> Result<Vec<f64>, ShapeMismatch> {
        if features.len() != self.coefficients.len() {
            return Err(ShapeMismatch::len(
                "model input",
                self.coefficients.len(),
                features.len(),
            ));
        }
        Ok(self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .collect())
    }

    /// `intercept + Σ coefficient_i · x_i`.
    pub fn predict(&self, features: &[f64]) -> Result<f64, ShapeMismatch> {
        Ok(self.intercept + self.contributions(features)?.iter().sum::<f64>())
    }
}

impl Artifact for LinearModel {
    const KIND: &'static str = "linear model";

    fn format_version(&self) -> u32 {
        self.format_version
    }

    fn validate(&self) -> Result<(), ShapeMismatch> {
        check_names("model feature_names", &FEATURE_NAMES, &self.feature_names)?;
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ShapeMismatch::len(
                "model coefficients",
                FEATURE_COUNT,
                self.coefficients.len(),
            ));
        }
        Ok(())
    }
}
