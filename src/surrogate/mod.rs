//! Probabilistic surrogate of the oracle
//!
//! [`SurrogateModel`] is the only view acquisition policies and the loop
//! have of the fitted model. [`GaussianProcess`] implements it with an exact
//! GP whose kernel, prior mean and noise model come from
//! [`SurrogateConfig`](crate::config::SurrogateConfig).

mod fit;
mod gp;
mod kernel;


pub use gp::GaussianProcess;
pub use kernel::Kernel;

use serde::{Deserialize, Serialize};

/// Fitted hyperparameters, reported in the model's standardized units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Kernel lengthscale over the normalized input
    pub lengthscale: f64,
    pub outputscale: f64,
    /// Observation noise variance
    pub noise: f64,
    /// Prior mean value (zero for a zero-mean model)
    pub mean: f64,
}

/// Posterior mean and standard deviation over a set of inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Posterior {
    pub mean: Vec<f64>,
    pub stddev: Vec<f64>,
}

/// Fitted surrogate queried at normalized inputs, answering in original units
pub trait SurrogateModel {
    /// Posterior mean and standard deviation of the latent function at `x`
    fn predict(&self, x: f64) -> (f64, f64);

    /// Posterior over many inputs
    fn posterior(&self, xs: &[f64]) -> Posterior {
        let (mean, stddev) = xs.iter().map(|&x| self.predict(x)).unzip();
        Posterior { mean, stddev }
    }

    /// Posterior covariance between `x` and each of `others`
    fn covariance_with(&self, x: f64, others: &[f64]) -> Vec<f64>;

    /// Observation noise variance in original output units
    fn noise_variance(&self) -> f64;

    fn hyperparameters(&self) -> Hyperparameters;
}
