//! Ensayo: closed-loop Bayesian experimental design in one dimension
//!
//! A run calibrates the physical input domain against a calibration oracle,
//! evaluates an initial design, then repeatedly fits a Gaussian-process
//! surrogate, maximizes an acquisition function to pick the next input, and
//! evaluates the oracle there until a stopping rule fires.
//!
//! ```no_run
//! use ensayo::config::load_config;
//! use ensayo::optim::run;
//! use ensayo::oracle::build_oracles;
//! use ensayo::viz::NullVisualizer;
//!
//! # fn main() -> ensayo::Result<()> {
//! let config = load_config("study.yaml")?;
//! let (mut oracle, mut calibration) = build_oracles(&config.oracle);
//! let report = run(&config, oracle.as_mut(), calibration.as_mut(), Box::new(NullVisualizer))?;
//! println!("best y = {} at x = {}", report.best.y, report.best.x_physical);
//! # Ok(())
//! # }
//! ```

pub mod acquisition;
pub mod calibrate;
pub mod cli;
pub mod config;
pub mod design;
pub mod error;
pub mod io;
pub mod optim;
pub mod oracle;
pub mod surrogate;
pub mod viz;

pub use error::{Error, Result};
