//! One-step knowledge gradient
//!
//! For a candidate x, each fantasy draws an observation `y_i` from the
//! predictive distribution at x. Conditioning on `y_i` shifts the posterior
//! mean everywhere by `Σ(x', x) / (σ²(x) + noise) · (y_i − μ(x))`. The value
//! of x is the average over fantasies of the best fantasy posterior mean,
//! less the best value already achievable without the observation.

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;

use super::AcquisitionFunction;
use crate::design::uniform_grid;
use crate::surrogate::SurrogateModel;

/// Resolution of the grid the fantasy posterior means are maximized over
const FANTASY_GRID: usize = 101;

/// Fixed standard-normal draws shared by every evaluation
///
/// Reusing the same draws makes the Monte Carlo estimate a deterministic,
/// smooth function of x, and lets two knowledge-gradient objects built from
/// one sampler be compared directly. Draws come in antithetic pairs (plus a
/// zero for an odd count), so their sample mean is exactly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FantasySampler {
    draws: Vec<f64>,
}

impl FantasySampler {
    /// Draw `num_fantasies` standard-normal base samples
    pub fn new(num_fantasies: usize, rng: &mut StdRng) -> Self {
        let n = num_fantasies.max(1);
        let half: Vec<f64> = (0..n / 2)
            .map(|_| rng.sample::<f64, _>(StandardNormal))
            .collect();
        let mut draws = half.clone();
        draws.extend(half.iter().map(|z| -z));
        if n % 2 == 1 {
            draws.push(0.0);
        }
        Self { draws }
    }

    /// Base samples
    pub fn draws(&self) -> &[f64] {
        &self.draws
    }
}

/// Knowledge-gradient acquisition
pub struct KnowledgeGradient<'a> {
    model: &'a dyn SurrogateModel,
    sampler: &'a FantasySampler,
    current_value: Option<f64>,
    grid: Vec<f64>,
    grid_mean: Vec<f64>,
}

impl<'a> KnowledgeGradient<'a> {
    /// Knowledge gradient without a baseline: the expected best fantasy mean
    pub fn new(model: &'a dyn SurrogateModel, sampler: &'a FantasySampler) -> Self {
        let grid = uniform_grid(FANTASY_GRID);
        let grid_mean = grid.iter().map(|&x| model.predict(x).0).collect();
        Self {
            model,
            sampler,
            current_value: None,
            grid,
            grid_mean,
        }
    }

    /// Measure the gain over `current_value`, the best current posterior mean
    pub fn with_current_value(mut self, current_value: f64) -> Self {
        self.current_value = Some(current_value);
        self
    }
}

impl AcquisitionFunction for KnowledgeGradient<'_> {
    fn evaluate(&self, x: f64) -> f64 {
        let (mean_x, stddev_x) = self.model.predict(x);
        let predictive_var = stddev_x * stddev_x + self.model.noise_variance();
        if predictive_var <= 0.0 {
            return 0.0;
        }
        let predictive_sd = predictive_var.sqrt();

        // The fantasy point itself is part of the discretization
        let cov_grid = self.model.covariance_with(x, &self.grid);
        let cov_self = stddev_x * stddev_x;

        let draws = self.sampler.draws();
        let total: f64 = draws
            .iter()
            .map(|&z| {
                let shift = z / predictive_sd;
                let at_x = mean_x + cov_self * shift;
                self.grid_mean
                    .iter()
                    .zip(&cov_grid)
                    .map(|(m, c)| m + c * shift)
                    .fold(at_x, f64::max)
            })
            .sum();
        let expected_best = total / draws.len() as f64;

        match self.current_value {
            Some(current) => expected_best - current,
            None => expected_best,
        }
    }
}
