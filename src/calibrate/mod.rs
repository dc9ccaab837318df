//! Domain calibration
//!
//! Finds the upper bound of the physical input such that the calibration
//! metric lands in `[ratio_min, ratio_max]`. The initial bracket is not
//! guaranteed to contain the target, so the search widens the bracket while
//! the metric is too small and bisects once it overshoots.

use serde::{Deserialize, Serialize};

use crate::config::CalibrationConfig;
use crate::oracle::CalibrationOracle;
use crate::{Error, Result};

/// Physical input domain `[lower, upper]`, frozen once calibrated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainBounds {
    pub lower: f64,
    pub upper: f64,
}

impl DomainBounds {
    /// Create bounds
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Domain width
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Map a normalized input in [0, 1] to physical units
    pub fn to_physical(&self, x_normalized: f64) -> f64 {
        x_normalized * self.width() + self.lower
    }

    /// Map a physical input to [0, 1]
    pub fn to_normalized(&self, x_physical: f64) -> f64 {
        let width = self.width();
        if width == 0.0 {
            return 0.0;
        }
        (x_physical - self.lower) / width
    }
}

/// One probe of the calibration search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationStep {
    pub step: usize,
    pub guess: f64,
    pub metric: f64,
}

/// Expansion/bisection search for the domain upper bound
#[derive(Debug, Clone)]
pub struct BoundsCalibrator {
    config: CalibrationConfig,
}

impl BoundsCalibrator {
    /// Create a calibrator
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// Determine the run's domain
    ///
    /// A configured fixed upper bound is used as is; otherwise the
    /// calibration oracle is searched until its metric is in range.
    pub fn calibrate<C>(&self, oracle: &mut C) -> Result<DomainBounds>
    where
        C: CalibrationOracle + ?Sized,
    {
        if let Some(upper) = self.config.fixed_upper {
            tracing::info!(upper, "Using configured upper bound, calibration skipped");
            return Ok(DomainBounds::new(self.config.lower, upper));
        }
        let steps = self.search(oracle)?;
        let upper = steps.last().map(|s| s.guess).unwrap_or(self.config.initial_guess);
        Ok(DomainBounds::new(self.config.lower, upper))
    }

    /// Run the search and return every probe, the last one being in range
    ///
    /// # Errors
    ///
    /// [`Error::BoundsNotFound`] when `max_steps` probes never hit the target
    /// interval, which happens when the metric is not monotonic in x.
    pub fn search<C>(&self, oracle: &mut C) -> Result<Vec<CalibrationStep>>
    where
        C: CalibrationOracle + ?Sized,
    {
        let CalibrationConfig {
            ratio_min,
            ratio_max,
            max_steps,
            ..
        } = self.config;

        // The bracket always starts at the origin, whatever the domain's lower bound
        let mut lower_guess = 0.0;
        let mut upper_guess = self.config.initial_guess;
        let mut steps = Vec::new();
        let mut last_metric = f64::NAN;

        for step in 1..=max_steps {
            let metric = oracle.metric(upper_guess)?;
            last_metric = metric;
            steps.push(CalibrationStep {
                step,
                guess: upper_guess,
                metric,
            });
            tracing::info!(step, guess = upper_guess, metric, "calibration probe");

            if (ratio_min..=ratio_max).contains(&metric) {
                tracing::info!(upper = upper_guess, steps = step, "Upper bound found");
                return Ok(steps);
            }

            if metric < ratio_min {
                let widened = 2.0 * upper_guess - lower_guess;
                lower_guess = upper_guess;
                upper_guess = widened;
            } else {
                upper_guess = (upper_guess + lower_guess) / 2.0;
            }
        }

        Err(Error::BoundsNotFound {
            iterations: max_steps,
            last_guess: upper_guess,
            last_metric,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::QuadraticOracle;
    use approx::assert_abs_diff_eq;

    struct Metric<F: FnMut(f64) -> f64>(F);

    impl<F: FnMut(f64) -> f64> CalibrationOracle for Metric<F> {
        fn metric(&mut self, x: f64) -> Result<f64> {
            Ok((self.0)(x))
        }
    }

    fn config(ratio_min: f64, ratio_max: f64) -> CalibrationConfig {
        CalibrationConfig {
            ratio_min,
            ratio_max,
            ..CalibrationConfig::default()
        }
    }

    #[test]
    fn test_linear_metric_converges() {
        let calibrator = BoundsCalibrator::new(config(1.5, 1.6));
        let mut oracle = QuadraticOracle::default();
        let steps = calibrator.search(&mut oracle).unwrap();
        // 10 -> 1.0 (expand), 20 -> 2.0 (bisect), 15 -> 1.5
        let guesses: Vec<f64> = steps.iter().map(|s| s.guess).collect();
        assert_eq!(guesses, vec![10.0, 20.0, 15.0]);

        let bounds = calibrator.calibrate(&mut oracle).unwrap();
        assert_abs_diff_eq!(bounds.upper, 15.0);
        assert_abs_diff_eq!(bounds.lower, 0.0);
    }

    #[test]
    fn test_expansion_is_by_bracket_width() {
        let calibrator = BoundsCalibrator::new(config(2.5, 3.2));
        let mut oracle = QuadraticOracle::default();
        let guesses: Vec<f64> = calibrator
            .search(&mut oracle)
            .unwrap()
            .iter()
            .map(|s| s.guess)
            .collect();
        assert_eq!(guesses, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_bracket_starts_at_origin_for_shifted_domain() {
        let mut cfg = config(1.5, 1.6);
        cfg.lower = 2.0;
        let calibrator = BoundsCalibrator::new(cfg);
        let mut oracle = QuadraticOracle::default();
        let guesses: Vec<f64> = calibrator
            .search(&mut oracle)
            .unwrap()
            .iter()
            .map(|s| s.guess)
            .collect();
        assert_eq!(guesses, vec![10.0, 20.0, 15.0]);

        let bounds = calibrator.calibrate(&mut oracle).unwrap();
        assert_eq!(bounds, DomainBounds::new(2.0, 15.0));
    }

    #[test]
    fn test_metric_in_range_at_first_guess() {
        let calibrator = BoundsCalibrator::new(config(0.9, 1.1));
        let mut oracle = QuadraticOracle::default();
        assert_eq!(calibrator.search(&mut oracle).unwrap().len(), 1);
    }

    #[test]
    fn test_non_monotonic_metric_reports_bounds_not_found() {
        let mut cfg = config(1.5, 1.6);
        cfg.max_steps = 25;
        let calibrator = BoundsCalibrator::new(cfg);
        // Always overshoots near the origin, always undershoots far out
        let mut oracle = Metric(|x: f64| if x > 5.0 { 0.5 } else { 3.0 });
        match calibrator.calibrate(&mut oracle) {
            Err(Error::BoundsNotFound { iterations, .. }) => assert_eq!(iterations, 25),
            other => panic!("Expected BoundsNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_fixed_upper_skips_oracle() {
        let mut cfg = config(1.5, 1.6);
        cfg.fixed_upper = Some(42.0);
        let calibrator = BoundsCalibrator::new(cfg);
        let mut calls = 0;
        let mut oracle = Metric(|_x: f64| {
            calls += 1;
            1.55
        });
        let bounds = calibrator.calibrate(&mut oracle).unwrap();
        assert_eq!(bounds, DomainBounds::new(0.0, 42.0));
        drop(oracle);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_oracle_failure_propagates() {
        struct Failing;
        impl CalibrationOracle for Failing {
            fn metric(&mut self, _x: f64) -> Result<f64> {
                Err(Error::oracle("tensile test", "exit status 1"))
            }
        }
        let calibrator = BoundsCalibrator::new(config(1.5, 1.6));
        assert!(matches!(
            calibrator.calibrate(&mut Failing),
            Err(Error::Oracle { .. })
        ));
    }

    #[test]
    fn test_domain_mapping() {
        let bounds = DomainBounds::new(2.0, 12.0);
        assert_abs_diff_eq!(bounds.to_physical(0.5), 7.0);
        assert_abs_diff_eq!(bounds.to_normalized(7.0), 0.5);
        assert_abs_diff_eq!(bounds.to_physical(0.0), 2.0);
        assert_abs_diff_eq!(bounds.to_physical(1.0), 12.0);
    }
}
