use super::measurement::RawMeasurement;

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

/// Number of engineered columns fed to the linear model.
pub const FEATURE_COUNT: usize = 18;

/// Leading columns rescaled by the min-max scaler; the trailing one-hot
/// columns are passed through.
pub const SCALED_FEATURE_COUNT: usize = 15;

/// Column order the scaler and model were fitted on. Artifacts are checked
/// against this list when they are loaded.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "length",
    "diameter",
    "height",
    "weight",
    "shucked_weight",
    "viscera_weight",
    "shell_weight",
    "sqrt_weight",
    "sqrt_shucked_weight",
    "sqrt_viscera_weight",
    "sqrt_shell_weight",
    "height_power_2",
    "crab_area",
    "crab_cylinder_size",
    "crab_sphere_size",
    "sex_f",
    "sex_i",
    "sex_m",
];

/// π as the model was trained with it.
pub const PI_APPROX: f64 = 22.0 / 7.0;

pub const CRAB_AREA: usize = 12;
pub const CRAB_CYLINDER_SIZE: usize = 13;
pub const CRAB_SPHERE_SIZE: usize = 14;

// ---------------------------------------------------------------------------
// FeatureVector
// ---------------------------------------------------------------------------

/// The 18 ordered feature values of one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Derive the engineered columns.
    ///
    /// Square roots of negative weights yield NaN; callers validate the
    /// measurement first.
    pub fn derive(raw: &RawMeasurement) -> Self {
        let crab_area = 4.0 * PI_APPROX * raw.diameter * raw.diameter;
        let crab_cylinder_size = crab_area * raw.height;
        let crab_sphere_size = (4.0 / 3.0) * PI_APPROX * raw.diameter.powi(3);
        let [sex_f, sex_i, sex_m] = raw.sex.indicators();

        FeatureVector([
            raw.length,
            raw.diameter,
            raw.height,
            raw.weight,
            raw.shucked_weight,
            raw.viscera_weight,
            raw.shell_weight,
            raw.weight.sqrt(),
            raw.shucked_weight.sqrt(),
            raw.viscera_weight.sqrt(),
            raw.shell_weight.sqrt(),
            raw.height.powi(2),
            crab_area,
            crab_cylinder_size,
            crab_sphere_size,
            sex_f,
            sex_i,
            sex_m,
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Columns handed to the scaler.
    pub fn scaled_part(&self) -> &[f64] {
        &self.0[..SCALED_FEATURE_COUNT]
    }

    pub fn one_hot_part(&self) -> &[f64] {
        &self.0[SCALED_FEATURE_COUNT..]
    }
}
