//! Append-only trial log
//!
//! One CSV file per run. Each trial is written as `x_physical,y` the moment
//! it is evaluated. When the run completes, six summary rows follow: the
//! query grid, the posterior mean, the posterior standard deviation, the
//! trial count, `maximizer,best_y`, and the elapsed seconds.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::design::Trial;
use crate::{Error, Result};

const SUMMARY_ROWS: usize = 6;

/// Final summary record of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Query grid in physical units
    pub grid: Vec<f64>,
    /// Posterior mean over the grid
    pub mean: Vec<f64>,
    /// Posterior standard deviation over the grid
    pub stddev: Vec<f64>,
    pub total_trials: usize,
    /// Physical input of the best trial
    pub maximizer: f64,
    pub best_y: f64,
    pub elapsed_seconds: f64,
}

/// Contents of a trial log read back from disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedRun {
    /// `(x_physical, y)` pairs in evaluation order
    pub trials: Vec<(f64, f64)>,
    /// Present only if the run completed
    pub summary: Option<RunSummary>,
}

impl LoggedRun {
    /// Pretty-printed JSON rendering
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))
    }
}

/// Writer for one run's trial log
#[derive(Debug)]
pub struct TrialLog {
    path: PathBuf,
    file: File,
}

impl TrialLog {
    /// Create or truncate the log at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        Ok(Self { path, file })
    }

    /// Log file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one trial and flush
    pub fn append_trial(&mut self, trial: &Trial) -> Result<()> {
        self.write_row(&[trial.x_physical, trial.y])
    }

    /// Append the six summary rows
    pub fn append_summary(&mut self, summary: &RunSummary) -> Result<()> {
        self.write_row(&summary.grid)?;
        self.write_row(&summary.mean)?;
        self.write_row(&summary.stddev)?;
        self.write_line(&summary.total_trials.to_string())?;
        self.write_row(&[summary.maximizer, summary.best_y])?;
        self.write_row(&[summary.elapsed_seconds])
    }

    fn write_row(&mut self, values: &[f64]) -> Result<()> {
        let line = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.write_line(&line)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.file.write_all(format!("{line}\n").as_bytes())?;
        self.file.flush()?;
        Ok(())
    }

    /// Parse a log written by [`TrialLog`]
    pub fn read(path: impl AsRef<Path>) -> Result<LoggedRun> {
        let file = File::open(path.as_ref())?;
        let mut rows: Vec<(usize, Vec<f64>)> = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let values = line
                .split(',')
                .map(|field| {
                    let field = field.trim();
                    field.parse::<f64>().map_err(|_| Error::LogFormat {
                        line: idx + 1,
                        message: format!("invalid number '{field}'"),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push((idx + 1, values));
        }

        let summary = if has_summary(&rows) {
            let tail = rows.split_off(rows.len() - SUMMARY_ROWS);
            Some(parse_summary(tail)?)
        } else {
            None
        };

        let trials = rows
            .into_iter()
            .map(|(line, values)| match values.as_slice() {
                [x, y] => Ok((*x, *y)),
                other => Err(Error::LogFormat {
                    line,
                    message: format!("expected 2 columns, got {}", other.len()),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LoggedRun { trials, summary })
    }
}

/// Trial rows always have two columns; the summary's count and elapsed rows have one
fn has_summary(rows: &[(usize, Vec<f64>)]) -> bool {
    let n = rows.len();
    if n < SUMMARY_ROWS {
        return false;
    }
    let width = |i: usize| rows[n - SUMMARY_ROWS + i].1.len();
    width(0) == width(1) && width(1) == width(2) && width(3) == 1 && width(4) == 2 && width(5) == 1
}

fn parse_summary(tail: Vec<(usize, Vec<f64>)>) -> Result<RunSummary> {
    let first_line = tail.first().map(|(line, _)| *line).unwrap_or_default();
    let [grid, mean, stddev, count, best, elapsed]: [(usize, Vec<f64>); SUMMARY_ROWS] =
        tail.try_into().map_err(|_| Error::LogFormat {
            line: first_line,
            message: "incomplete summary record".to_string(),
        })?;
    let (count_line, count) = count;

    let total = count[0];
    if total < 0.0 || total.fract() != 0.0 {
        return Err(Error::LogFormat {
            line: count_line,
            message: format!("trial count '{total}' is not a whole number"),
        });
    }

    Ok(RunSummary {
        grid: grid.1,
        mean: mean.1,
        stddev: stddev.1,
        total_trials: total as usize,
        maximizer: best.1[0],
        best_y: best.1[1],
        elapsed_seconds: elapsed.1[0],
    })
}
