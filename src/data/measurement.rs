use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Sex – the categorical input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sex {
    #[default]
    Male,
    Female,
    Indeterminate,
}

impl Sex {
    pub const ALL: [Sex; 3] = [Sex::Male, Sex::Female, Sex::Indeterminate];

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Indeterminate => "Indeterminate",
        }
    }

    /// One-hot indicators in feature order: (F, I, M).
    pub fn indicators(self) -> [f64; 3] {
        match self {
            Sex::Female => [1.0, 0.0, 0.0],
            Sex::Indeterminate => [0.0, 1.0, 0.0],
            Sex::Male => [0.0, 0.0, 1.0],
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sex '{0}', expected Male/Female/Indeterminate (or M/F/I)")]
pub struct ParseSexError(pub String);

/// Only the first letter is significant, so both the form labels and the
/// dataset's `M`/`F`/`I` codes parse.
impl FromStr for Sex {
    type Err = ParseSexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('M') => Ok(Sex::Male),
            Some('F') => Ok(Sex::Female),
            Some('I') => Ok(Sex::Indeterminate),
            _ => Err(ParseSexError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Field table – documented domain of every numeric input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Length,
    Diameter,
    Height,
    Weight,
    ShuckedWeight,
    VisceraWeight,
    ShellWeight,
}

/// Bounds and display metadata of one numeric form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub description: &'static str,
}

pub const FIELDS: [FieldSpec; 7] = [
    FieldSpec {
        field: Field::Length,
        key: "length",
        label: "Length",
        unit: "feet",
        min: 0.0,
        max: 2.5,
        step: 0.01,
        description: "Length of the crab (1 foot = 30.48 cm)",
    },
    FieldSpec {
        field: Field::Diameter,
        key: "diameter",
        label: "Diameter",
        unit: "feet",
        min: 0.0,
        max: 2.0,
        step: 0.01,
        description: "Diameter of the crab (1 foot = 30.48 cm)",
    },
    FieldSpec {
        field: Field::Height,
        key: "height",
        label: "Height",
        unit: "feet",
        min: 0.0,
        max: 1.0,
        step: 0.01,
        description: "Height of the crab (1 foot = 30.48 cm)",
    },
    FieldSpec {
        field: Field::Weight,
        key: "weight",
        label: "Weight",
        unit: "ounces",
        min: 0.0,
        max: 80.0,
        step: 1.0,
        description: "Weight of the crab (1 pound = 16 ounces)",
    },
    FieldSpec {
        field: Field::ShuckedWeight,
        key: "shucked_weight",
        label: "Shucked Weight",
        unit: "ounces",
        min: 0.0,
        max: 40.0,
        step: 1.0,
        description: "Weight without the shell",
    },
    FieldSpec {
        field: Field::VisceraWeight,
        key: "viscera_weight",
        label: "Viscera Weight",
        unit: "ounces",
        min: 0.0,
        max: 20.0,
        step: 1.0,
        description: "Weight that wraps around the abdominal organs",
    },
    FieldSpec {
        field: Field::ShellWeight,
        key: "shell_weight",
        label: "Shell Weight",
        unit: "ounces",
        min: 0.0,
        max: 20.0,
        step: 1.0,
        description: "Weight of the shell",
    },
];

// ---------------------------------------------------------------------------
// RawMeasurement
// ---------------------------------------------------------------------------

/// The eight user-supplied quantities of one crab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMeasurement {
    pub sex: Sex,
    pub length: f64,
    pub diameter: f64,
    pub height: f64,
    pub weight: f64,
    pub shucked_weight: f64,
    pub viscera_weight: f64,
    pub shell_weight: f64,
}

impl Default for RawMeasurement {
    fn default() -> Self {
        Self {
            sex: Sex::Male,
            length: 1.0,
            diameter: 1.0,
            height: 0.5,
            weight: 40.0,
            shucked_weight: 20.0,
            viscera_weight: 10.0,
            shell_weight: 10.0,
        }
    }
}

impl RawMeasurement {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Length => self.length,
            Field::Diameter => self.diameter,
            Field::Height => self.height,
            Field::Weight => self.weight,
            Field::ShuckedWeight => self.shucked_weight,
            Field::VisceraWeight => self.viscera_weight,
            Field::ShellWeight => self.shell_weight,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut f64 {
        match field {
            Field::Length => &mut self.length,
            Field::Diameter => &mut self.diameter,
            Field::Height => &mut self.height,
            Field::Weight => &mut self.weight,
            Field::ShuckedWeight => &mut self.shucked_weight,
            Field::VisceraWeight => &mut self.viscera_weight,
            Field::ShellWeight => &mut self.shell_weight,
        }
    }

    /// Reject negative or non-finite values before any square root is taken.
    ///
    /// Upper bounds are not checked here: the form clamps to them and the
    /// scaler extrapolates linearly beyond its fit range.
    pub fn validate(&self) -> Result<(), PipelineError> {
        for spec in &FIELDS {
            let value = self.get(spec.field);
            if !value.is_finite() || value < 0.0 {
                return Err(PipelineError::NumericDomain {
                    field: spec.key,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Copy with every field clamped into its documented range.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for spec in &FIELDS {
            let v = out.get_mut(spec.field);
            *v = v.clamp(spec.min, spec.max);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_parses_labels_and_codes() {
        assert_eq!("Male".parse::<Sex>(), Ok(Sex::Male));
        assert_eq!("F".parse::<Sex>(), Ok(Sex::Female));
        assert_eq!(" indeterminate".parse::<Sex>(), Ok(Sex::Indeterminate));
        assert!("".parse::<Sex>().is_err());
        assert!("X".parse::<Sex>().is_err());
    }

    #[test]
    fn test_indicators_are_one_hot() {
        for sex in Sex::ALL {
            let ind = sex.indicators();
            assert_eq!(ind.iter().sum::<f64>(), 1.0);
            assert!(ind.iter().all(|&v| v == 0.0 || v == 1.0));
        }
        assert_eq!(Sex::Male.indicators(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        assert!(RawMeasurement::default().validate().is_ok());

        let mut m = RawMeasurement::default();
        m.viscera_weight = -0.1;
        match m.validate() {
            Err(PipelineError::NumericDomain { field, .. }) => assert_eq!(field, "viscera_weight"),
            other => panic!("expected NumericDomain, got {other:?}"),
        }

        let mut m = RawMeasurement::default();
        m.length = f64::NAN;
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_out_of_form_range_is_still_valid() {
        let mut m = RawMeasurement::default();
        m.weight = 120.0;
        assert!(m.validate().is_ok());
        assert_eq!(m.clamped().weight, 80.0);
    }
}
