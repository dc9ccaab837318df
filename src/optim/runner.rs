//! The closed optimization loop
//!
//! [`OptimizationLoop::initialize`] performs the INIT phase (calibration,
//! initial design, first fit). [`OptimizationLoop::step`] runs one
//! acquire/evaluate/refit/stop-check cycle while ITERATING, and
//! [`OptimizationLoop::finish`] writes the summary once the loop is STOPPED.

use std::path::PathBuf;
use std::time::Instant;

use rand::rngs::StdRng;
use serde::Serialize;

use super::stopping::{build_stopping, StopReason, StoppingRule};
use crate::acquisition::{build_policy, AcquisitionPolicy};
use crate::calibrate::{BoundsCalibrator, DomainBounds};
use crate::config::{RunConfig, RunIdentity};
use crate::design::{linspace, seeded_rng, uniform_grid, DesignHistory, DesignInitializer, Trial};
use crate::io::{append_identity, RunSummary, TrialLog};
use crate::oracle::{CalibrationOracle, Oracle};
use crate::surrogate::{GaussianProcess, Posterior, SurrogateModel};
use crate::viz::Visualizer;
use crate::{Error, Result};

/// Loop phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoopState {
    /// Calibrating and evaluating the initial design
    Init,
    Iterating,
    Stopped(StopReason),
}

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub identity: RunIdentity,
    pub bounds: DomainBounds,
    pub history: DesignHistory,
    /// `None` when the run was finished before a stop condition
    pub stop_reason: Option<StopReason>,
    pub best: Trial,
    /// Query grid in physical units
    pub grid: Vec<f64>,
    /// Final posterior over `grid`
    pub posterior: Posterior,
    pub elapsed_seconds: f64,
    pub log_path: PathBuf,
}

/// State of one closed-loop run
pub struct OptimizationLoop<'c> {
    config: &'c RunConfig,
    bounds: DomainBounds,
    history: DesignHistory,
    model: GaussianProcess,
    policy: Box<dyn AcquisitionPolicy>,
    stopping: Box<dyn StoppingRule>,
    visualizer: Box<dyn Visualizer>,
    log: TrialLog,
    rng: StdRng,
    state: LoopState,
    iterations: usize,
    started: Instant,
}

impl<'c> OptimizationLoop<'c> {
    /// Calibrate the domain, evaluate the initial design and fit the surrogate
    ///
    /// The trial log is truncated here, so every row it holds afterwards
    /// belongs to this run.
    pub fn initialize<O, C>(
        config: &'c RunConfig,
        oracle: &mut O,
        calibration: &mut C,
        mut visualizer: Box<dyn Visualizer>,
    ) -> Result<Self>
    where
        O: Oracle + ?Sized,
        C: CalibrationOracle + ?Sized,
    {
        let started = Instant::now();
        tracing::info!(identity = %config.identity, "Starting run");

        let bounds = BoundsCalibrator::new(config.calibration).calibrate(calibration)?;
        tracing::info!(lower = bounds.lower, upper = bounds.upper, "Domain calibrated");

        let mut log = TrialLog::create(log_path(config))?;
        let mut rng = seeded_rng(config.design.seed);
        let mut history = DesignHistory::new();
        DesignInitializer::new(config.design).run(oracle, &bounds, &mut rng, &mut history, &mut log)?;

        let model = GaussianProcess::fit(&config.surrogate, &history)?;
        render(visualizer.as_mut(), &model, &history, &bounds, config.output.grid_points, None)?;

        Ok(Self {
            config,
            bounds,
            stopping: build_stopping(&config.stopping, &history),
            policy: build_policy(&config.acquisition),
            history,
            model,
            visualizer,
            log,
            rng,
            state: LoopState::Iterating,
            iterations: 0,
            started,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn bounds(&self) -> DomainBounds {
        self.bounds
    }

    pub fn history(&self) -> &DesignHistory {
        &self.history
    }

    /// Surrogate fitted to the full current history
    pub fn model(&self) -> &GaussianProcess {
        &self.model
    }

    /// Iterations completed after the initial design
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Run one acquisition cycle, returning the stop reason once stopped
    pub fn step<O>(&mut self, oracle: &mut O) -> Result<Option<StopReason>>
    where
        O: Oracle + ?Sized,
    {
        if let LoopState::Stopped(reason) = self.state {
            return Ok(Some(reason));
        }
        if self.iterations >= self.config.stopping.max_iterations {
            return Ok(Some(self.stop(StopReason::IterationCap)));
        }

        let candidate = self
            .policy
            .propose(&self.model, &self.history, &mut self.rng)?;
        tracing::debug!(
            x = candidate.x,
            value = candidate.value,
            acquisition = self.policy.kind().tag(),
            "candidate"
        );
        let trial = self.add_trial(oracle, candidate.x)?;
        self.iterations += 1;

        tracing::info!(
            trial = self.history.len(),
            x = trial.x_physical,
            y = trial.y,
            best = self.history.best_value().unwrap_or(trial.y),
            "trial"
        );

        if self.stopping.should_stop(&self.history) {
            return Ok(Some(self.stop(self.stopping.reason())));
        }
        if self.iterations >= self.config.stopping.max_iterations {
            return Ok(Some(self.stop(StopReason::IterationCap)));
        }
        Ok(None)
    }

    /// Iterate until a stop condition or the iteration cap
    pub fn run_to_stop<O>(&mut self, oracle: &mut O) -> Result<StopReason>
    where
        O: Oracle + ?Sized,
    {
        loop {
            if let Some(reason) = self.step(oracle)? {
                return Ok(reason);
            }
        }
    }

    /// Evaluate the oracle at a normalized input, persist and append the
    /// trial, then refit the surrogate over the whole history
    pub fn add_trial<O>(&mut self, oracle: &mut O, x_normalized: f64) -> Result<Trial>
    where
        O: Oracle + ?Sized,
    {
        let x_physical = self.bounds.to_physical(x_normalized);
        let y = oracle.evaluate(x_physical)?;
        let trial = Trial::new(x_normalized, &self.bounds, y);
        self.log.append_trial(&trial)?;
        self.history.push(trial);

        self.model = GaussianProcess::fit(&self.config.surrogate, &self.history)?;
        render(
            self.visualizer.as_mut(),
            &self.model,
            &self.history,
            &self.bounds,
            self.config.output.grid_points,
            Some(x_physical),
        )?;
        Ok(trial)
    }

    fn stop(&mut self, reason: StopReason) -> StopReason {
        self.state = LoopState::Stopped(reason);
        tracing::info!(
            reason = %reason,
            trials = self.history.len(),
            iterations = self.iterations,
            "Optimization stopped"
        );
        reason
    }

    /// Append the summary rows and register the run identity
    pub fn finish(mut self) -> Result<RunReport> {
        let best = self.history.best().copied().ok_or(Error::EmptyHistory)?;
        let grid_points = self.config.output.grid_points;
        let posterior = self.model.posterior(&uniform_grid(grid_points));
        let grid = linspace(self.bounds.lower, self.bounds.upper, grid_points);
        let elapsed_seconds = self.started.elapsed().as_secs_f64();

        self.log.append_summary(&RunSummary {
            grid: grid.clone(),
            mean: posterior.mean.clone(),
            stddev: posterior.stddev.clone(),
            total_trials: self.history.len(),
            maximizer: best.x_physical,
            best_y: best.y,
            elapsed_seconds,
        })?;
        append_identity(
            self.config.output.dir.join(&self.config.output.registry),
            &self.config.identity,
        )?;

        tracing::info!(
            maximizer = best.x_physical,
            best_y = best.y,
            trials = self.history.len(),
            elapsed_seconds,
            "Run complete"
        );

        let stop_reason = match self.state {
            LoopState::Stopped(reason) => Some(reason),
            _ => None,
        };
        Ok(RunReport {
            identity: self.config.identity.clone(),
            bounds: self.bounds,
            history: self.history,
            stop_reason,
            best,
            grid,
            posterior,
            elapsed_seconds,
            log_path: self.log.path().to_path_buf(),
        })
    }
}

/// Run the whole loop without interactive augmentation
pub fn run<O, C>(
    config: &RunConfig,
    oracle: &mut O,
    calibration: &mut C,
    visualizer: Box<dyn Visualizer>,
) -> Result<RunReport>
where
    O: Oracle + ?Sized,
    C: CalibrationOracle + ?Sized,
{
    let mut session = OptimizationLoop::initialize(config, oracle, calibration, visualizer)?;
    session.run_to_stop(oracle)?;
    session.finish()
}

/// Trial log location: `<dir>/<prefix><identity>.csv`
pub fn log_path(config: &RunConfig) -> PathBuf {
    config
        .output
        .dir
        .join(format!("{}{}.csv", config.output.log_prefix, config.identity))
}

fn render(
    visualizer: &mut dyn Visualizer,
    model: &GaussianProcess,
    history: &DesignHistory,
    bounds: &DomainBounds,
    grid_points: usize,
    candidate: Option<f64>,
) -> Result<()> {
    let posterior = model.posterior(&uniform_grid(grid_points));
    let physical = linspace(bounds.lower, bounds.upper, grid_points);
    visualizer.render(
        history,
        bounds,
        &physical,
        &posterior.mean,
        &posterior.stddev,
        candidate,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunSpec;
    use crate::io::TrialLog;
    use crate::oracle::QuadraticOracle;
    use crate::viz::NullVisualizer;

    fn config(dir: &std::path::Path, max_iterations: usize) -> RunConfig {
        RunConfig::resolve(&spec(dir, max_iterations))
    }

    fn spec(dir: &std::path::Path, max_iterations: usize) -> RunSpec {
        let mut spec = RunSpec::default();
        spec.domain.upper = Some(10.0);
        spec.design.strategy = "uniform".to_string();
        spec.design.initial_points = 3;
        spec.design.seed = Some(17);
        spec.model.noise = "fixed".to_string();
        spec.acquisition.num_restarts = 4;
        spec.acquisition.raw_samples = 64;
        spec.stopping.consecutive_trials = 1000;
        spec.stopping.max_iterations = max_iterations;
        spec.output.dir = dir.to_path_buf();
        spec.output.grid_points = 50;
        spec
    }

    fn oracle(x: f64) -> Result<f64> {
        Ok(-(x - 3.0).powi(2))
    }

    #[test]
    fn test_iteration_cap_stops_loop() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 2);
        let mut f = oracle;
        let mut session = OptimizationLoop::initialize(
            &config,
            &mut f,
            &mut QuadraticOracle::default(),
            Box::new(NullVisualizer),
        )
        .unwrap();
        assert_eq!(session.state(), LoopState::Iterating);
        assert_eq!(session.bounds(), DomainBounds::new(0.0, 10.0));
        assert_eq!(session.history().len(), 3);

        let reason = session.run_to_stop(&mut f).unwrap();
        assert_eq!(reason, StopReason::IterationCap);
        assert_eq!(session.iterations(), 2);
        assert_eq!(session.history().len(), 5);
        assert_eq!(session.state(), LoopState::Stopped(StopReason::IterationCap));

        // Further steps are no-ops
        assert_eq!(session.step(&mut f).unwrap(), Some(StopReason::IterationCap));
        assert_eq!(session.history().len(), 5);
    }

    #[test]
    fn test_value_stopping_fires_on_kth_plateau_trial() {
        let dir = tempfile::tempdir().unwrap();
        let mut spec = spec(dir.path(), 50);
        spec.model.noise = "learned".to_string();
        spec.stopping.policy = "value".to_string();
        spec.stopping.improvement_threshold = 1e-4;
        spec.stopping.consecutive_trials = 3;
        let config = RunConfig::resolve(&spec);

        // Initial design, then one improvement followed by a plateau
        let mut values = vec![0.0, 1.0, 0.5, 2.0, 1.5, 1.9, 2.00005].into_iter();
        let mut scripted = move |_x: f64| -> Result<f64> {
            values
                .next()
                .ok_or_else(|| Error::oracle("scripted oracle", "no values left"))
        };

        let mut session = OptimizationLoop::initialize(
            &config,
            &mut scripted,
            &mut QuadraticOracle::default(),
            Box::new(NullVisualizer),
        )
        .unwrap();
        for _ in 0..3 {
            assert_eq!(session.step(&mut scripted).unwrap(), None);
        }
        assert_eq!(
            session.step(&mut scripted).unwrap(),
            Some(StopReason::ValueStagnation)
        );
        assert_eq!(session.iterations(), 4);
        assert_eq!(session.history().len(), 7);
    }

    #[test]
    fn test_zero_iterations_stops_after_design() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 0);
        let mut f = oracle;
        let report = run(&config, &mut f, &mut QuadraticOracle::default(), Box::new(NullVisualizer))
            .unwrap();
        assert_eq!(report.stop_reason, Some(StopReason::IterationCap));
        assert_eq!(report.history.len(), 3);
    }

    #[test]
    fn test_finish_writes_summary_and_registry() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 1);
        let mut f = oracle;
        let mut session = OptimizationLoop::initialize(
            &config,
            &mut f,
            &mut QuadraticOracle::default(),
            Box::new(NullVisualizer),
        )
        .unwrap();
        session.run_to_stop(&mut f).unwrap();
        let added = session.add_trial(&mut f, 0.3).unwrap();
        assert!((added.x_physical - 3.0).abs() < 1e-12);
        assert_eq!(session.model().num_train(), 5);

        let report = session.finish().unwrap();
        assert_eq!(report.log_path, log_path(&config));
        assert_eq!(report.best.y, 0.0);
        assert_eq!(report.grid.len(), 50);

        let logged = TrialLog::read(&report.log_path).unwrap();
        assert_eq!(logged.trials.len(), 5);
        let summary = logged.summary.unwrap();
        assert_eq!(summary.total_trials, 5);
        assert_eq!(summary.maximizer, report.best.x_physical);

        let registry = dir.path().join(&config.output.registry);
        let identities = crate::io::read_identities(registry).unwrap();
        assert_eq!(identities, vec![config.identity.to_string()]);
    }

    #[test]
    fn test_oracle_failure_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 5);
        let mut failing = |_x: f64| -> Result<f64> { Err(Error::oracle("simulation", "crashed")) };
        let result = run(
            &config,
            &mut failing,
            &mut QuadraticOracle::default(),
            Box::new(NullVisualizer),
        );
        assert!(matches!(result, Err(Error::Oracle { .. })));
    }
}
