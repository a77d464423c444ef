use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nalgebra::{DMatrix, DVector};

use crab_age::data::artifacts::{LinearModel, MinMaxScaler};
use crab_age::data::features::{FeatureVector, FEATURE_COUNT, SCALED_FEATURE_COUNT};
use crab_age::data::loader::{DEFAULT_MODEL_PATH, DEFAULT_SCALER_PATH};
use crab_age::data::measurement::{RawMeasurement, Sex};

const SEED: u64 = 42;
const SAMPLE_COUNT: usize = 3000;
const RIDGE: f64 = 1e-6;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// A synthetic crab of known age. Size follows a saturating growth curve,
/// weights scale with volume.
fn synth_crab(rng: &mut SimpleRng) -> (RawMeasurement, f64) {
    let age = rng.uniform(2.0, 26.0);
    let growth = 1.0 - (-age / 9.0).exp();
    let sex = if age < 6.0 && rng.next_f64() < 0.7 {
        Sex::Indeterminate
    } else if rng.next_f64() < 0.5 {
        Sex::Male
    } else {
        Sex::Female
    };

    let noise = |rng: &mut SimpleRng, sd: f64| (1.0 + rng.gauss(0.0, sd)).max(0.05);
    let length = (1.9 * growth * noise(rng, 0.05)).min(2.5);
    let diameter = (0.78 * length * noise(rng, 0.04)).min(2.0);
    let height = (0.27 * length * noise(rng, 0.08)).min(1.0);
    let weight = (9.5 * length.powi(3) * noise(rng, 0.10)).min(80.0);
    let shucked_weight = (0.43 * weight * noise(rng, 0.08)).min(40.0);
    let viscera_weight = (0.22 * weight * noise(rng, 0.10)).min(20.0);
    let shell_weight = (0.29 * weight * noise(rng, 0.08)).min(20.0);

    let measurement = RawMeasurement {
        sex,
        length,
        diameter,
        height,
        weight,
        shucked_weight,
        viscera_weight,
        shell_weight,
    };
    (measurement, (age + rng.gauss(0.0, 1.0)).max(1.0))
}

/// Ordinary least squares with an intercept and a small ridge term on the
/// coefficients (the one-hot block is collinear with the intercept).
fn fit_linear(rows: &[[f64; FEATURE_COUNT]], targets: &[f64]) -> Result<LinearModel> {
    let n = FEATURE_COUNT + 1;
    let x = DMatrix::from_fn(rows.len(), n, |i, j| if j == 0 { 1.0 } else { rows[i][j - 1] });
    let y = DVector::from_column_slice(targets);

    let mut xtx = x.transpose() * &x;
    for i in 1..n {
        xtx[(i, i)] += RIDGE * rows.len() as f64;
    }
    let xty = x.transpose() * y;

    let beta = xtx
        .cholesky()
        .context("normal equations are not positive definite")?
        .solve(&xty);
    Ok(LinearModel::new(beta.as_slice()[1..].to_vec(), beta[0]))
}

/// Synthesize `SAMPLE_COUNT` crabs from `seed`, fit the scaler on them and
/// the model on the scaled features.
fn fit_artifacts(seed: u64) -> Result<(MinMaxScaler, LinearModel, Vec<(RawMeasurement, f64)>)> {
    let mut rng = SimpleRng::new(seed);
    let crabs: Vec<(RawMeasurement, f64)> =
        (0..SAMPLE_COUNT).map(|_| synth_crab(&mut rng)).collect();

    let features: Vec<FeatureVector> = crabs.iter().map(|(m, _)| FeatureVector::derive(m)).collect();
    let scaled_rows: Vec<[f64; SCALED_FEATURE_COUNT]> = features
        .iter()
        .map(|f| {
            let mut row = [0.0; SCALED_FEATURE_COUNT];
            row.copy_from_slice(f.scaled_part());
            row
        })
        .collect();
    let scaler = MinMaxScaler::fit(&scaled_rows);

    let mut model_rows = Vec::with_capacity(features.len());
    for f in &features {
        let mut row = [0.0; FEATURE_COUNT];
        row[..SCALED_FEATURE_COUNT].copy_from_slice(&scaler.transform(f.scaled_part())?);
        row[SCALED_FEATURE_COUNT..].copy_from_slice(f.one_hot_part());
        model_rows.push(row);
    }
    let targets: Vec<f64> = crabs.iter().map(|(_, age)| *age).collect();
    let model = fit_linear(&model_rows, &targets)?;

    Ok((scaler, model, crabs))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let text = serde_json::to_string_pretty(value).context("serializing artifact")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn write_samples(path: &Path, crabs: &[(RawMeasurement, f64)]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating sample CSV")?;
    writer.write_record([
        "id", "Sex", "Length", "Diameter", "Height", "Weight",
        "Shucked Weight", "Viscera Weight", "Shell Weight", "Age",
    ])?;
    for (id, (m, age)) in crabs.iter().enumerate().take(50) {
        let code = &m.sex.label()[..1];
        writer.write_record([
            id.to_string(),
            code.to_string(),
            format!("{:.4}", m.length),
            format!("{:.4}", m.diameter),
            format!("{:.4}", m.height),
            format!("{:.4}", m.weight),
            format!("{:.4}", m.shucked_weight),
            format!("{:.4}", m.viscera_weight),
            format!("{:.4}", m.shell_weight),
            format!("{}", age.round() as i64),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let (scaler, model, crabs) = fit_artifacts(SEED)?;

    let scaler_path = out_dir.join(DEFAULT_SCALER_PATH);
    let model_path = out_dir.join(DEFAULT_MODEL_PATH);
    let samples_path = out_dir.join("sample_crabs.csv");
    write_json(&scaler_path, &scaler)?;
    write_json(&model_path, &model)?;
    write_samples(&samples_path, &crabs)?;

    log::info!("Fitted on {SAMPLE_COUNT} synthetic crabs, intercept {:.3}", model.intercept);
    println!(
        "Wrote {}, {} and {}",
        scaler_path.display(),
        model_path.display(),
        samples_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(what: &str, got: &[f64], shipped: &[f64], tol: f64) {
        assert_eq!(got.len(), shipped.len(), "{what} length");
        for (i, (g, s)) in got.iter().zip(shipped).enumerate() {
            assert!((g - s).abs() <= tol * s.abs().max(1.0), "{what}[{i}]: fitted {g}, shipped {s}");
        }
    }

    #[test]
    fn test_shipped_artifacts_match_seeded_fit() {
        let (scaler, model, _) = fit_artifacts(SEED).unwrap();

        let shipped_scaler: MinMaxScaler =
            serde_json::from_str(include_str!("../../encoders_scalers/min-max-scaler.json")).unwrap();
        let shipped_model: LinearModel =
            serde_json::from_str(include_str!("../../models_cache/linear-regression.json")).unwrap();

        assert_eq!(scaler.feature_names, shipped_scaler.feature_names);
        assert_close("data_min", &scaler.data_min, &shipped_scaler.data_min, 1e-9);
        assert_close("data_max", &scaler.data_max, &shipped_scaler.data_max, 1e-9);

        assert_eq!(model.feature_names, shipped_model.feature_names);
        assert_close("coefficients", &model.coefficients, &shipped_model.coefficients, 1e-6);
        assert_close("intercept", &[model.intercept], &[shipped_model.intercept], 1e-6);
    }

    #[test]
    fn test_fit_recovers_linear_relation() {
        let mut rng = SimpleRng::new(7);
        let mut rows = Vec::new();
        let mut targets = Vec::new();
        for _ in 0..500 {
            let mut row = [0.0; FEATURE_COUNT];
            for v in row.iter_mut().take(SCALED_FEATURE_COUNT) {
                *v = rng.next_f64();
            }
            row[15 + (rng.next_u64() % 3) as usize] = 1.0;
            targets.push(4.0 + 3.0 * row[0] - 2.0 * row[5]);
            rows.push(row);
        }
        let model = fit_linear(&rows, &targets).unwrap();
        for (row, y) in rows.iter().zip(&targets).take(20) {
            assert!((model.predict(row).unwrap() - y).abs() < 1e-2);
        }
    }

    #[test]
    fn test_synthetic_crabs_are_valid() {
        let mut rng = SimpleRng::new(42);
        for _ in 0..200 {
            let (m, age) = synth_crab(&mut rng);
            assert!(m.validate().is_ok());
            assert_eq!(m.clamped(), m);
            assert!(age >= 1.0);
        }
    }
}
