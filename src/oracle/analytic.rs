//! Analytic test oracle

use super::{CalibrationOracle, Oracle};
use crate::Result;

/// Concave quadratic `y = a·x² + b·x` with a linear calibration metric
///
/// The default coefficients peak at `x = b / (-2a) ≈ 15.0`, standing in for
/// the muscle contraction simulation during development.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticOracle {
    a: f64,
    b: f64,
    metric_scale: f64,
}

impl Default for QuadraticOracle {
    fn default() -> Self {
        Self::new(-0.001678, 0.05034)
    }
}

impl QuadraticOracle {
    /// Create an oracle with the given coefficients
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            a,
            b,
            metric_scale: 10.0,
        }
    }

    /// Set the divisor of the calibration metric `x / scale`
    pub fn with_metric_scale(mut self, scale: f64) -> Self {
        self.metric_scale = scale;
        self
    }

    /// Analytic maximizer, if the parabola is concave
    pub fn maximizer(&self) -> Option<f64> {
        (self.a < 0.0).then(|| -self.b / (2.0 * self.a))
    }

    fn value(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x
    }
}

impl Oracle for QuadraticOracle {
    fn evaluate(&mut self, x: f64) -> Result<f64> {
        Ok(self.value(x))
    }
}

impl CalibrationOracle for QuadraticOracle {
    fn metric(&mut self, x: f64) -> Result<f64> {
        Ok(x / self.metric_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_maximizer() {
        let oracle = QuadraticOracle::default();
        assert_abs_diff_eq!(oracle.maximizer().unwrap(), 0.05034 / (2.0 * 0.001678), epsilon = 1e-12);
        assert_abs_diff_eq!(oracle.maximizer().unwrap(), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_convex_has_no_maximizer() {
        assert!(QuadraticOracle::new(1.0, 0.0).maximizer().is_none());
    }

    #[test]
    fn test_evaluate_and_metric() {
        let mut oracle = QuadraticOracle::default().with_metric_scale(4.0);
        assert_abs_diff_eq!(oracle.evaluate(0.0).unwrap(), 0.0);
        assert_abs_diff_eq!(oracle.evaluate(30.0).unwrap(), 0.0, epsilon = 1e-12);
        assert!(oracle.evaluate(15.0).unwrap() > oracle.evaluate(14.0).unwrap());
        assert_abs_diff_eq!(oracle.metric(8.0).unwrap(), 2.0);
    }
}
