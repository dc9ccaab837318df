//! Error types for ensayo
//!
//! Every fatal condition of a run surfaces through [`Error`]. Recoverable
//! configuration problems never reach this type: they are resolved to a
//! default by [`crate::config`] and reported as a `tracing` warning.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ensayo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The oracle process could not be launched or exited unsuccessfully
    #[error("Oracle failed while {context}: {message}")]
    Oracle { context: String, message: String },

    /// The oracle ran but its output file is missing or malformed
    #[error("Oracle output {path}: {message}")]
    OracleOutput { path: PathBuf, message: String },

    /// Calibration exhausted its step budget without hitting the target ratio
    #[error(
        "Upper bound not found after {iterations} steps (last guess {last_guess}, metric {last_metric})\n  → Check that the calibration metric is monotonic in x or widen the target interval"
    )]
    BoundsNotFound {
        iterations: usize,
        last_guess: f64,
        last_metric: f64,
    },

    #[error("Surrogate error: {0}")]
    Surrogate(String),

    #[error("No trials recorded")]
    EmptyHistory,

    #[error("Malformed trial log at line {line}: {message}")]
    LogFormat { line: usize, message: String },
}

impl Error {
    /// Create an oracle error with context
    pub fn oracle(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Oracle {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an oracle output error for a file path
    pub fn oracle_output(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::OracleOutput {
            path: path.into(),
            message: message.into(),
        }
    }
}
