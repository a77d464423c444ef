use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::loader::Resources;
use super::measurement::{RawMeasurement, Sex};
use super::pipeline::predict;

// ---------------------------------------------------------------------------
// CSV layout
// ---------------------------------------------------------------------------

/// One row of the crab dataset. Other columns (`Age`, ...) are ignored.
///
/// ```text
/// id,Sex,Length,Diameter,Height,Weight,Shucked Weight,Viscera Weight,Shell Weight
/// 0,M,1.4375,1.175,0.4125,24.6357,12.3320,5.5848,6.7475
/// ```
#[derive(Debug, Clone, Deserialize)]
struct InputRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "Sex")]
    sex: String,
    #[serde(rename = "Length")]
    length: f64,
    #[serde(rename = "Diameter")]
    diameter: f64,
    #[serde(rename = "Height")]
    height: f64,
    #[serde(rename = "Weight")]
    weight: f64,
    #[serde(rename = "Shucked Weight")]
    shucked_weight: f64,
    #[serde(rename = "Viscera Weight")]
    viscera_weight: f64,
    #[serde(rename = "Shell Weight")]
    shell_weight: f64,
}

impl InputRow {
    fn to_measurement(&self) -> Result<RawMeasurement> {
        let sex: Sex = self.sex.parse()?;
        Ok(RawMeasurement {
            sex,
            length: self.length,
            diameter: self.diameter,
            height: self.height,
            weight: self.weight,
            shucked_weight: self.shucked_weight,
            viscera_weight: self.viscera_weight,
            shell_weight: self.shell_weight,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct OutputRow<'a> {
    id: Option<&'a str>,
    #[serde(rename = "Sex")]
    sex: &'static str,
    #[serde(rename = "Length")]
    length: f64,
    #[serde(rename = "Diameter")]
    diameter: f64,
    #[serde(rename = "Height")]
    height: f64,
    #[serde(rename = "Weight")]
    weight: f64,
    #[serde(rename = "Shucked Weight")]
    shucked_weight: f64,
    #[serde(rename = "Viscera Weight")]
    viscera_weight: f64,
    #[serde(rename = "Shell Weight")]
    shell_weight: f64,
    #[serde(rename = "Predicted Age")]
    predicted_age: f64,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Predict every row of `input` and write the rows plus `Predicted Age`.
/// Returns the number of rows written. The first bad row aborts the run;
/// errors name its line in the file.
pub fn predict_csv<R: Read, W: Write>(input: R, output: W, resources: &Resources) -> Result<usize> {
    let mut reader = csv::Reader::from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let mut count = 0;

    for (row_no, result) in reader.deserialize::<InputRow>().enumerate() {
        // Header is line 1.
        let line = row_no + 2;
        let row = result.with_context(|| format!("CSV line {line}"))?;
        let m = row
            .to_measurement()
            .with_context(|| format!("CSV line {line}"))?;
        let predicted_age =
            predict(&m, resources).with_context(|| format!("CSV line {line}: prediction failed"))?;

        writer
            .serialize(OutputRow {
                id: row.id.as_deref(),
                sex: m.sex.label(),
                length: m.length,
                diameter: m.diameter,
                height: m.height,
                weight: m.weight,
                shucked_weight: m.shucked_weight,
                viscera_weight: m.viscera_weight,
                shell_weight: m.shell_weight,
                predicted_age,
            })
            .with_context(|| format!("writing CSV line {line}"))?;
        count += 1;
    }

    writer.flush().context("flushing CSV output")?;
    Ok(count)
}

/// File-to-file wrapper around [`predict_csv`].
pub fn predict_csv_file(input: &Path, output: &Path, resources: &Resources) -> Result<usize> {
    let src = std::fs::File::open(input)
        .with_context(|| format!("opening {}", input.display()))?;
    let dst = std::fs::File::create(output)
        .with_context(|| format!("creating {}", output.display()))?;
    let n = predict_csv(src, dst, resources)?;
    log::info!(
        "Predicted {n} rows from {} into {}",
        input.display(),
        output.display()
    );
    Ok(n)
}
