//! End-to-end tests: artifacts on disk → cache → prediction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crab_age::data::artifacts::{LinearModel, MinMaxScaler};
use crab_age::data::features::{FEATURE_COUNT, SCALED_FEATURE_COUNT};
use crab_age::data::loader::load_artifact;
use crab_age::data::measurement::FIELDS;
use crab_age::{
    predict, ArtifactError, ArtifactPaths, PipelineError, RawMeasurement, ResourceCache,
    Resources, Sex,
};
use tempfile::TempDir;

fn shipped_paths() -> ArtifactPaths {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let defaults = ArtifactPaths::default();
    ArtifactPaths {
        scaler: root.join(defaults.scaler),
        model: root.join(defaults.model),
    }
}

fn write_json(dir: &TempDir, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

fn write_artifacts(dir: &TempDir, coefficients: Vec<f64>, intercept: f64) -> ArtifactPaths {
    let scaler = MinMaxScaler::fit(&[[0.0; SCALED_FEATURE_COUNT], [2.0; SCALED_FEATURE_COUNT]]);
    let model = LinearModel::new(coefficients, intercept);
    ArtifactPaths {
        scaler: write_json(dir, "scaler.json", &serde_json::to_value(&scaler).unwrap()),
        model: write_json(dir, "model.json", &serde_json::to_value(&model).unwrap()),
    }
}

#[test]
fn test_artifacts_load_and_predict() {
    let dir = TempDir::new().unwrap();
    let mut coef = vec![0.0; FEATURE_COUNT];
    coef[2] = 4.0; // height, scaled by 1/2
    coef[15] = 1.0; // sex_f
    let paths = write_artifacts(&dir, coef, 0.5);

    let res = Resources::load(&paths).unwrap();
    let female = RawMeasurement {
        sex: Sex::Female,
        ..RawMeasurement::default()
    };
    let male = RawMeasurement::default();

    assert!((predict(&female, &res).unwrap() - (0.5 + 4.0 * 0.25 + 1.0)).abs() < 1e-12);
    assert!((predict(&male, &res).unwrap() - (0.5 + 4.0 * 0.25)).abs() < 1e-12);
}

#[test]
fn test_cache_reads_files_once() {
    let dir = TempDir::new().unwrap();
    let paths = write_artifacts(&dir, vec![0.1; FEATURE_COUNT], 1.0);
    let cache = ResourceCache::new();

    let first = cache.get_or_load(&paths).unwrap();
    std::fs::remove_file(&paths.scaler).unwrap();
    std::fs::remove_file(&paths.model).unwrap();
    let second = cache.get_or_load(&paths).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_concurrent_first_use_shares_one_load() {
    let dir = TempDir::new().unwrap();
    let paths = write_artifacts(&dir, vec![0.1; FEATURE_COUNT], 1.0);
    let cache = ResourceCache::new();

    let loaded: Vec<Arc<Resources>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| cache.get_or_load(&paths).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for r in &loaded[1..] {
        assert!(Arc::ptr_eq(&loaded[0], r));
    }
}

#[test]
fn test_corrupt_artifact_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, b"\x80\x04pickle").unwrap();
    let err = load_artifact::<LinearModel>(&path).unwrap_err();
    assert!(matches!(err, ArtifactError::Parse { .. }), "got {err:?}");

    std::fs::write(&path, "{\"format_version\": 1}").unwrap();
    let err = load_artifact::<LinearModel>(&path).unwrap_err();
    assert!(matches!(err, ArtifactError::Parse { .. }));
}

#[test]
fn test_unknown_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut model = serde_json::to_value(LinearModel::new(vec![0.0; FEATURE_COUNT], 0.0)).unwrap();
    model["format_version"] = serde_json::json!(2);
    let path = write_json(&dir, "model.json", &model);

    let err = load_artifact::<LinearModel>(&path).unwrap_err();
    assert!(matches!(err, ArtifactError::UnsupportedVersion { found: 2, .. }));
}

#[test]
fn test_short_scaler_is_shape_error() {
    let dir = TempDir::new().unwrap();
    let mut scaler = serde_json::to_value(MinMaxScaler::fit(&[[0.0; SCALED_FEATURE_COUNT]])).unwrap();
    scaler["data_max"].as_array_mut().unwrap().pop();
    let path = write_json(&dir, "scaler.json", &scaler);

    let err = load_artifact::<MinMaxScaler>(&path).unwrap_err();
    assert!(matches!(err, ArtifactError::Shape { .. }));
}

#[test]
fn test_inverted_scaler_bounds_are_shape_error() {
    let dir = TempDir::new().unwrap();
    let mut scaler = serde_json::to_value(MinMaxScaler::fit(&[
        [0.0; SCALED_FEATURE_COUNT],
        [1.0; SCALED_FEATURE_COUNT],
    ]))
    .unwrap();
    scaler["data_min"][4] = serde_json::json!(3.0);
    let path = write_json(&dir, "scaler.json", &scaler);

    match load_artifact::<MinMaxScaler>(&path).unwrap_err() {
        ArtifactError::Shape { mismatch, .. } => assert_eq!(mismatch.what, "scaler bounds[4]"),
        other => panic!("expected Shape, got {other:?}"),
    }
}

#[test]
fn test_load_error_propagates_through_cache() {
    let dir = TempDir::new().unwrap();
    let paths = ArtifactPaths {
        scaler: dir.path().join("absent-scaler.json"),
        model: dir.path().join("absent-model.json"),
    };
    let err = ResourceCache::new().get_or_load(&paths).unwrap_err();
    let err: PipelineError = err.into();
    assert!(matches!(err, PipelineError::Artifact(ArtifactError::Io { .. })));
}

#[test]
fn test_shipped_artifacts_give_finite_predictions_within_bounds() {
    let res = Resources::load(&shipped_paths()).unwrap();

    for sex in Sex::ALL {
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let mut m = RawMeasurement {
                sex,
                ..RawMeasurement::default()
            };
            for spec in &FIELDS {
                *m.get_mut(spec.field) = spec.min + t * (spec.max - spec.min);
            }
            let age = predict(&m, &res).unwrap();
            assert!(age.is_finite(), "{m:?} gave {age}");
        }
    }
}

#[test]
fn test_shipped_artifacts_are_bit_stable() {
    let res = Resources::load(&shipped_paths()).unwrap();
    let raw = RawMeasurement::default();
    let a = predict(&raw, &res).unwrap();
    let b = predict(&raw, &res).unwrap();
    assert_eq!(a.to_bits(), b.to_bits());
}
