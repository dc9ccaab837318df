//! Initial design evaluation

use rand::rngs::StdRng;

use super::history::{DesignHistory, Trial};
use super::sequence::{uniform_grid, ScrambledSobol};
use crate::calibrate::DomainBounds;
use crate::config::{DesignConfig, DesignStrategy};
use crate::io::TrialLog;
use crate::oracle::Oracle;
use crate::Result;

/// Produces the initial normalized points and evaluates the oracle at each
#[derive(Debug, Clone)]
pub struct DesignInitializer {
    config: DesignConfig,
}

impl DesignInitializer {
    /// Create an initializer
    pub fn new(config: DesignConfig) -> Self {
        Self { config }
    }

    /// Normalized design points in evaluation order
    pub fn points(&self, rng: &mut StdRng) -> Vec<f64> {
        let n = self.config.initial_points;
        match self.config.strategy {
            DesignStrategy::Sobol => ScrambledSobol::new(rng).take_points(n),
            DesignStrategy::Uniform => uniform_grid(n),
        }
    }

    /// Evaluate every design point, persisting each trial before the next
    pub fn run<O>(
        &self,
        oracle: &mut O,
        bounds: &DomainBounds,
        rng: &mut StdRng,
        history: &mut DesignHistory,
        log: &mut TrialLog,
    ) -> Result<()>
    where
        O: Oracle + ?Sized,
    {
        for x in self.points(rng) {
            let x_physical = bounds.to_physical(x);
            let y = oracle.evaluate(x_physical)?;
            let trial = Trial::new(x, bounds, y);
            log.append_trial(&trial)?;
            history.push(trial);
            tracing::info!(
                trial = history.len(),
                x = x_physical,
                y,
                "initial design point"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::seeded_rng;
    use crate::Error;

    fn config(strategy: DesignStrategy, n: usize) -> DesignConfig {
        DesignConfig {
            strategy,
            initial_points: n,
            seed: Some(5),
        }
    }

    #[test]
    fn test_sobol_points_distinct() {
        let init = DesignInitializer::new(config(DesignStrategy::Sobol, 5));
        let mut points = init.points(&mut seeded_rng(Some(5)));
        assert_eq!(points.len(), 5);
        assert!(points.iter().all(|p| (0.0..=1.0).contains(p)));
        points.sort_by(f64::total_cmp);
        points.dedup();
        assert_eq!(points.len(), 5);
    }

    #[test]
    fn test_uniform_points_include_endpoints() {
        let init = DesignInitializer::new(config(DesignStrategy::Uniform, 5));
        let points = init.points(&mut seeded_rng(None));
        assert_eq!(points, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_run_appends_and_persists_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let mut log = TrialLog::create(&path).unwrap();
        let mut history = DesignHistory::new();
        let bounds = DomainBounds::new(0.0, 20.0);
        let mut oracle = |x: f64| -> Result<f64> { Ok(x * 2.0) };

        DesignInitializer::new(config(DesignStrategy::Uniform, 3))
            .run(&mut oracle, &bounds, &mut seeded_rng(None), &mut history, &mut log)
            .unwrap();

        assert_eq!(history.xs(), vec![0.0, 0.5, 1.0]);
        assert_eq!(history.ys(), vec![0.0, 20.0, 40.0]);
        let logged = TrialLog::read(&path).unwrap();
        assert_eq!(logged.trials, vec![(0.0, 0.0), (10.0, 20.0), (20.0, 40.0)]);
    }

    #[test]
    fn test_failure_keeps_completed_trials() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let mut log = TrialLog::create(&path).unwrap();
        let mut history = DesignHistory::new();
        let bounds = DomainBounds::new(0.0, 1.0);
        let mut calls = 0;
        let mut oracle = |x: f64| -> Result<f64> {
            calls += 1;
            if calls == 2 {
                Err(Error::oracle("running simulation", "exit status 1"))
            } else {
                Ok(x)
            }
        };

        let result = DesignInitializer::new(config(DesignStrategy::Uniform, 3)).run(
            &mut oracle,
            &bounds,
            &mut seeded_rng(None),
            &mut history,
            &mut log,
        );
        assert!(result.is_err());
        assert_eq!(history.len(), 1);
        assert_eq!(TrialLog::read(&path).unwrap().trials.len(), 1);
    }
}
