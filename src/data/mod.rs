/// Data layer: measurements, feature engineering, artifacts and prediction.
///
/// Architecture:
/// ```text
///  RawMeasurement (form / CSV row)
///        │
///        ▼
///   ┌──────────┐
///   │ features  │  derive 18 ordered columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ MinMaxScaler  │  rescale columns 0..15, one-hot columns untouched
///   └──────────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ LinearModel  │  intercept + Σ coef·x  →  age in months
///   └─────────────┘
/// ```
///
/// Both artifacts are read once by the `loader` and shared read-only.

pub mod artifacts;
pub mod batch;
pub mod features;
pub mod loader;
pub mod measurement;
pub mod pipeline;
