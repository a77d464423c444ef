//! The process-wide artifact cache. Kept in its own test binary: the cache
//! is a static and the paths come from the environment.

use std::sync::Arc;

use crab_age::data::artifacts::{LinearModel, MinMaxScaler};
use crab_age::data::features::{FEATURE_COUNT, SCALED_FEATURE_COUNT};
use crab_age::data::loader::{MODEL_PATH_ENV, SCALER_PATH_ENV};
use crab_age::{load_resources, ArtifactPaths};
use tempfile::TempDir;

#[test]
fn test_env_paths_are_loaded_once_for_the_process() {
    let dir = TempDir::new().unwrap();
    let scaler_path = dir.path().join("scaler.json");
    let model_path = dir.path().join("model.json");

    let scaler = MinMaxScaler::fit(&[[0.0; SCALED_FEATURE_COUNT], [4.0; SCALED_FEATURE_COUNT]]);
    let coefficients: Vec<f64> = (0..FEATURE_COUNT).map(|i| i as f64 * 0.5).collect();
    let model = LinearModel::new(coefficients.clone(), 7.25);
    std::fs::write(&scaler_path, serde_json::to_string(&scaler).unwrap()).unwrap();
    std::fs::write(&model_path, serde_json::to_string(&model).unwrap()).unwrap();

    std::env::set_var(SCALER_PATH_ENV, &scaler_path);
    std::env::set_var(MODEL_PATH_ENV, &model_path);
    assert_eq!(
        ArtifactPaths::from_env(),
        ArtifactPaths {
            scaler: scaler_path.clone(),
            model: model_path.clone(),
        }
    );

    let first = load_resources().unwrap();
    assert_eq!(first.model.coefficients, coefficients);
    assert_eq!(first.model.intercept, 7.25);
    assert_eq!(first.scaler.data_max, vec![4.0; SCALED_FEATURE_COUNT]);

    std::fs::remove_file(&scaler_path).unwrap();
    std::fs::remove_file(&model_path).unwrap();

    let second = load_resources().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.model.coefficients, coefficients);
}
