//! Black-box oracles
//!
//! An [`Oracle`] maps a physical input to a scalar outcome; a
//! [`CalibrationOracle`] maps it to the ratio the domain calibration targets.
//! Both calls block until the experiment finishes and report failure through
//! [`crate::Error`]; the loop never retries.

mod analytic;
mod process;

pub use analytic::QuadraticOracle;
pub use process::{read_csv_rows, ProcessCalibration, ProcessOracle};

use crate::config::OracleSpec;
use crate::Result;

/// Experiment evaluated at a physical input
pub trait Oracle {
    /// Run the experiment at `x` and return its outcome
    fn evaluate(&mut self, x: f64) -> Result<f64>;
}

/// Calibration experiment evaluated at a candidate upper bound
pub trait CalibrationOracle {
    /// Run the calibration experiment at `x` and return its metric
    fn metric(&mut self, x: f64) -> Result<f64>;
}

impl<F> Oracle for F
where
    F: FnMut(f64) -> Result<f64>,
{
    fn evaluate(&mut self, x: f64) -> Result<f64> {
        self(x)
    }
}

/// Construct the oracle pair described by a specification
pub fn build_oracles(
    spec: &OracleSpec,
) -> (Box<dyn Oracle>, Box<dyn CalibrationOracle>) {
    match spec {
        OracleSpec::Quadratic { a, b, metric_scale } => {
            let oracle = QuadraticOracle::new(*a, *b).with_metric_scale(*metric_scale);
            (Box::new(oracle.clone()), Box::new(oracle))
        }
        OracleSpec::Process(process) => (
            Box::new(ProcessOracle::new(process.clone())),
            Box::new(ProcessCalibration::new(process.clone())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_oracle() {
        let mut calls = 0;
        let mut oracle = |x: f64| -> Result<f64> {
            calls += 1;
            Ok(2.0 * x)
        };
        assert_eq!(oracle.evaluate(3.0).unwrap(), 6.0);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_build_quadratic_pair() {
        let (mut oracle, mut calibration) = build_oracles(&OracleSpec::default());
        let y = oracle.evaluate(15.0).unwrap();
        assert!((y - (-0.001678 * 225.0 + 0.05034 * 15.0)).abs() < 1e-12);
        assert!((calibration.metric(10.0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_oracle_failure_propagates() {
        let mut oracle = |_x: f64| -> Result<f64> {
            Err(crate::Error::oracle("running simulation", "exit status 3"))
        };
        assert!(oracle.evaluate(1.0).is_err());
    }
}
