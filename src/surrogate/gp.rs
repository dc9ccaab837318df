//! Exact Gaussian process regression

use nalgebra::{Cholesky, DVector, Dyn};

use super::fit::{evaluate, Search};
use super::kernel::Kernel;
use super::{Hyperparameters, SurrogateModel};
use crate::config::{NoiseKind, SurrogateConfig};
use crate::design::DesignHistory;
use crate::{Error, Result};

/// Minimum output standard deviation before standardization is disabled
const MIN_STD: f64 = 1e-12;

/// Output standardization `(y − offset) / scale`
#[derive(Debug, Clone, Copy, PartialEq)]
struct Standardizer {
    offset: f64,
    scale: f64,
}

impl Standardizer {
    fn from_values(ys: &[f64]) -> Self {
        let n = ys.len() as f64;
        let offset = ys.iter().sum::<f64>() / n;
        let scale = if ys.len() > 1 {
            let var = ys.iter().map(|y| (y - offset).powi(2)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };
        Self {
            offset,
            scale: if scale < MIN_STD { 1.0 } else { scale },
        }
    }

    fn forward(&self, y: f64) -> f64 {
        (y - self.offset) / self.scale
    }
}

/// Gaussian process fitted to a design history
///
/// Training inputs are the normalized trial inputs; outputs are standardized
/// internally. Every query takes normalized inputs and answers in the
/// original output units. A new history means a new fit: the state is never
/// updated in place.
#[derive(Debug, Clone)]
pub struct GaussianProcess {
    kernel: Kernel,
    /// Noise variance, standardized units
    noise: f64,
    /// Prior mean, standardized units
    constant: f64,
    xs: Vec<f64>,
    cholesky: Cholesky<f64, Dyn>,
    alpha: DVector<f64>,
    standardizer: Standardizer,
    log_likelihood: f64,
}

impl GaussianProcess {
    /// Fit by maximizing the exact marginal likelihood
    ///
    /// # Errors
    ///
    /// [`Error::EmptyHistory`] with no trials, [`Error::Surrogate`] when the
    /// covariance cannot be factored even with jitter.
    pub fn fit(config: &SurrogateConfig, history: &DesignHistory) -> Result<Self> {
        if history.is_empty() {
            return Err(Error::EmptyHistory);
        }
        let xs = history.xs();
        let raw = history.ys();
        let standardizer = Standardizer::from_values(&raw);
        let ys: Vec<f64> = raw.iter().map(|&y| standardizer.forward(y)).collect();

        let fixed_noise = match config.noise {
            NoiseKind::Fixed { variance } => Some(variance),
            NoiseKind::Learned => None,
        };
        let search = Search {
            kind: config.kernel,
            mean: config.mean,
            fixed_noise,
            xs: &xs,
            ys: &ys,
        };
        let fitted = search.run().ok_or_else(|| {
            Error::Surrogate(format!(
                "covariance of {} trials is not positive definite",
                xs.len()
            ))
        })?;

        let gp = Self {
            kernel: fitted.kernel,
            noise: fitted.noise,
            constant: fitted.constant,
            xs,
            cholesky: fitted.cholesky,
            alpha: fitted.alpha,
            standardizer,
            log_likelihood: fitted.log_likelihood,
        };
        let h = gp.hyperparameters();
        tracing::debug!(
            lengthscale = h.lengthscale,
            outputscale = h.outputscale,
            noise = h.noise,
            mean = h.mean,
            log_likelihood = gp.log_likelihood,
            "surrogate fitted"
        );
        Ok(gp)
    }

    /// Fit with explicit hyperparameters (standardized units), skipping the search
    pub fn with_hyperparameters(
        config: &SurrogateConfig,
        history: &DesignHistory,
        lengthscale: f64,
        outputscale: f64,
        noise: f64,
    ) -> Result<Self> {
        if history.is_empty() {
            return Err(Error::EmptyHistory);
        }
        let xs = history.xs();
        let raw = history.ys();
        let standardizer = Standardizer::from_values(&raw);
        let ys: Vec<f64> = raw.iter().map(|&y| standardizer.forward(y)).collect();
        let kernel = Kernel::new(config.kernel, lengthscale, outputscale);
        let fitted = evaluate(kernel, config.mean, noise, &xs, &ys)
            .ok_or_else(|| Error::Surrogate("covariance is not positive definite".to_string()))?;
        Ok(Self {
            kernel,
            noise,
            constant: fitted.constant,
            xs,
            cholesky: fitted.cholesky,
            alpha: fitted.alpha,
            standardizer,
            log_likelihood: fitted.log_likelihood,
        })
    }

    /// Log marginal likelihood at the fitted hyperparameters
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Number of training points
    pub fn num_train(&self) -> usize {
        self.xs.len()
    }

    /// Latent posterior in standardized units
    fn standardized(&self, x: f64) -> (f64, f64) {
        let k_star = self.kernel.vector(x, &self.xs);
        let mean = self.constant + k_star.dot(&self.alpha);
        let v = self.cholesky.solve(&k_star);
        let var = self.kernel.outputscale - k_star.dot(&v);
        (mean, var.max(0.0))
    }
}

impl SurrogateModel for GaussianProcess {
    fn predict(&self, x: f64) -> (f64, f64) {
        let (mean, var) = self.standardized(x);
        let s = self.standardizer;
        (s.offset + s.scale * mean, s.scale * var.sqrt())
    }

    fn covariance_with(&self, x: f64, others: &[f64]) -> Vec<f64> {
        let k_x = self.kernel.vector(x, &self.xs);
        let solved = self.cholesky.solve(&k_x);
        let scale2 = self.standardizer.scale.powi(2);
        others
            .iter()
            .map(|&o| {
                let k_o = self.kernel.vector(o, &self.xs);
                scale2 * (self.kernel.eval(o, x) - k_o.dot(&solved))
            })
            .collect()
    }

    fn noise_variance(&self) -> f64 {
        self.noise * self.standardizer.scale.powi(2)
    }

    fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            lengthscale: self.kernel.lengthscale,
            outputscale: self.kernel.outputscale,
            noise: self.noise,
            mean: self.constant,
        }
    }
}
