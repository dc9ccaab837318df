//! Oracles backed by an external simulation process
//!
//! Each evaluation launches the configured program synchronously, waits for
//! it to exit, and parses the CSV file it leaves behind. A per-evaluation tag
//! keeps concurrent or repeated runs from reading each other's outputs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{CalibrationOracle, Oracle};
use crate::config::ProcessSpec;
use crate::{Error, Result};

/// Simulation oracle returning the muscle contraction
#[derive(Debug, Clone)]
pub struct ProcessOracle {
    spec: ProcessSpec,
}

impl ProcessOracle {
    /// Create a simulation oracle
    pub fn new(spec: ProcessSpec) -> Self {
        Self { spec }
    }

    fn output_path(&self, prefix: &str, tag: &str) -> PathBuf {
        self.spec.working_dir.join(format!("{prefix}{tag}.csv"))
    }
}

impl Oracle for ProcessOracle {
    fn evaluate(&mut self, x: f64) -> Result<f64> {
        let tag = evaluation_tag(x);
        tracing::info!(x, tag = %tag, "start simulation");
        launch(&self.spec.program, &self.spec.args, &self.spec.working_dir, x, &tag)?;
        tracing::info!(x, "end simulation");

        let prestretch_path = self.output_path(&self.spec.prestretch_prefix, &tag);
        if prestretch_path.exists() {
            if let Some(row) = read_csv_rows(&prestretch_path)?.last() {
                let stretch = field(row, 1, &prestretch_path)? - field(row, 0, &prestretch_path)?;
                tracing::debug!(prestretch = stretch, "The muscle was stretched");
            }
        }

        let contraction_path = self.output_path(&self.spec.contraction_prefix, &tag);
        let contraction = contraction_from_file(&contraction_path)?;
        tracing::info!(contraction, "The muscle contracted");
        Ok(contraction)
    }
}

/// Calibration oracle returning the relative prestretch of a tensile test
#[derive(Debug, Clone)]
pub struct ProcessCalibration {
    spec: ProcessSpec,
}

impl ProcessCalibration {
    /// Create a calibration oracle
    pub fn new(spec: ProcessSpec) -> Self {
        Self { spec }
    }
}

impl CalibrationOracle for ProcessCalibration {
    fn metric(&mut self, x: f64) -> Result<f64> {
        let program = self.spec.calibration_program.as_deref().ok_or_else(|| {
            Error::oracle(
                "calibrating the domain",
                "no calibration_program configured; set domain.upper to skip calibration",
            )
        })?;
        let tag = evaluation_tag(x);
        launch(program, &self.spec.calibration_args, &self.spec.working_dir, x, &tag)?;

        let path = self
            .spec
            .working_dir
            .join(format!("{}{tag}.csv", self.spec.prestretch_prefix));
        let ratio = relative_prestretch_from_file(&path)?;
        fs::remove_file(&path)?;
        Ok(ratio)
    }
}

/// Token distinguishing the output files of one evaluation
fn evaluation_tag(x: f64) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("{secs}_{x}")
}

/// Substitute `{x}` and `{tag}` placeholders in launch arguments
fn substitute(args: &[String], x: f64, tag: &str) -> Vec<String> {
    args.iter()
        .map(|a| a.replace("{x}", &x.to_string()).replace("{tag}", tag))
        .collect()
}

fn launch(program: &str, args: &[String], dir: &Path, x: f64, tag: &str) -> Result<()> {
    let args = substitute(args, x, tag);
    let status = Command::new(program)
        .args(&args)
        .current_dir(dir)
        .status()
        .map_err(|e| Error::oracle(format!("launching {program}"), e.to_string()))?;

    if !status.success() {
        return Err(Error::oracle(
            format!("running {program} at x = {x}"),
            format!("process exited with {status}"),
        ));
    }
    Ok(())
}

/// Read a comma-separated file into rows of raw fields, skipping blank lines
pub fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::oracle_output(path, format!("cannot read output file: {e}")))?;
    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(',').map(|f| f.trim().to_string()).collect())
        .collect())
}

fn parse_field(raw: &str, path: &Path) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| Error::oracle_output(path, format!("invalid number '{raw}'")))
}

fn field(row: &[String], index: usize, path: &Path) -> Result<f64> {
    let raw = row.get(index).ok_or_else(|| {
        Error::oracle_output(path, format!("expected at least {} columns", index + 1))
    })?;
    parse_field(raw, path)
}

/// Contraction = first recorded length minus the second-to-last field
///
/// All fields of all rows are flattened in order, trailing empty fields
/// included, so a row written with a trailing separator makes the
/// second-to-last field the final recorded length.
fn contraction_from_file(path: &Path) -> Result<f64> {
    let fields: Vec<String> = read_csv_rows(path)?.into_iter().flatten().collect();
    if fields.len() < 2 {
        return Err(Error::oracle_output(
            path,
            format!("expected at least 2 fields, got {}", fields.len()),
        ));
    }
    let first = parse_field(&fields[0], path)?;
    let last = parse_field(&fields[fields.len() - 2], path)?;
    Ok(first - last)
}

/// Relative prestretch = stretched length / initial length of the last row
fn relative_prestretch_from_file(path: &Path) -> Result<f64> {
    let rows = read_csv_rows(path)?;
    let row = rows
        .last()
        .ok_or_else(|| Error::oracle_output(path, "file contains no rows"))?;
    let initial = field(row, 0, path)?;
    let stretched = field(row, 1, path)?;
    if initial == 0.0 {
        return Err(Error::oracle_output(path, "initial length is zero"));
    }
    Ok(stretched / initial)
}
