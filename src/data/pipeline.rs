use super::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES, SCALED_FEATURE_COUNT};
use super::loader::Resources;
use super::measurement::RawMeasurement;
use crate::error::{PipelineError, ShapeMismatch};

/// Everything computed for one prediction, kept for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionBreakdown {
    pub measurement: RawMeasurement,
    pub features: FeatureVector,
    /// Model input: scaled leading columns followed by the one-hot columns.
    pub model_input: [f64; FEATURE_COUNT],
    pub contributions: [f64; FEATURE_COUNT],
    pub intercept: f64,
    /// Predicted age in months. Not clamped.
    pub age_months: f64,
}

impl PredictionBreakdown {
    pub fn rows(&self) -> impl Iterator<Item = FeatureRow> + '_ {
        (0..FEATURE_COUNT).map(move |i| FeatureRow {
            name: FEATURE_NAMES[i],
            raw: self.features.0[i],
            scaled: self.model_input[i],
            contribution: self.contributions[i],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub name: &'static str,
    pub raw: f64,
    pub scaled: f64,
    pub contribution: f64,
}

fn to_array(values: Vec<f64>, what: &str) -> Result<[f64; FEATURE_COUNT], ShapeMismatch> {
    let found = values.len();
    values
        .try_into()
        .map_err(|_| ShapeMismatch::len(what, FEATURE_COUNT, found))
}

/// Run the full pipeline and keep the intermediate values.
pub fn explain(
    raw: &RawMeasurement,
    resources: &Resources,
) -> Result<PredictionBreakdown, PipelineError> {
    raw.validate()?;

    let features = FeatureVector::derive(raw);

    let mut model_input = resources.scaler.transform(features.scaled_part())?;
    debug_assert_eq!(model_input.len(), SCALED_FEATURE_COUNT);
    model_input.extend_from_slice(features.one_hot_part());
    let model_input = to_array(model_input, "model input")?;

    let contributions = to_array(resources.model.contributions(&model_input)?, "contributions")?;
    let intercept = resources.model.intercept;
    let age_months = intercept + contributions.iter().sum::<f64>();

    log::debug!("Predicted {age_months:.2} months for {raw:?}");

    Ok(PredictionBreakdown {
        measurement: *raw,
        features,
        model_input,
        contributions,
        intercept,
        age_months,
    })
}

/// Predicted crab age in months.
pub fn predict(raw: &RawMeasurement, resources: &Resources) -> Result<f64, PipelineError> {
    explain(raw, resources).map(|b| b.age_months)
}
