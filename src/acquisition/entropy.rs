//! Max-value entropy search
//!
//! The distribution of the maximum value y* is approximated from a dense
//! candidate set: assuming independence across candidates,
//! `P(y* < y) ≈ Π Φ((y − μᵢ) / σᵢ)`. A Gumbel distribution is matched to the
//! quartiles of that product and a handful of y* samples are drawn from it.
//! A candidate x scores the expected reduction in entropy of its predictive
//! distribution once y* is known.

use rand::rngs::StdRng;
use rand::Rng;

use super::normal;
use super::AcquisitionFunction;
use crate::surrogate::SurrogateModel;

/// Number of y* samples averaged over
pub const MAX_VALUE_SAMPLES: usize = 10;

const MIN_STDDEV: f64 = 1e-10;
const QUANTILE_BISECTIONS: usize = 100;

/// Max-value entropy acquisition
pub struct MaxValueEntropy<'a> {
    model: &'a dyn SurrogateModel,
    max_values: Vec<f64>,
}

impl<'a> MaxValueEntropy<'a> {
    /// Build from a candidate set of normalized inputs
    pub fn new(model: &'a dyn SurrogateModel, candidate_set: &[f64], rng: &mut StdRng) -> Self {
        let posterior = model.posterior(candidate_set);
        let stddev: Vec<f64> = posterior.stddev.iter().map(|s| s.max(MIN_STDDEV)).collect();
        let max_values = sample_max_values(&posterior.mean, &stddev, MAX_VALUE_SAMPLES, rng);
        Self { model, max_values }
    }

    /// Sampled maximum values
    pub fn max_values(&self) -> &[f64] {
        &self.max_values
    }
}

impl AcquisitionFunction for MaxValueEntropy<'_> {
    fn evaluate(&self, x: f64) -> f64 {
        let (mean, stddev) = self.model.predict(x);
        let stddev = stddev.max(MIN_STDDEV);
        let total: f64 = self
            .max_values
            .iter()
            .map(|&y_star| {
                let gamma = (y_star - mean) / stddev;
                0.5 * gamma * normal::inverse_mills(gamma) - normal::log_cdf(gamma)
            })
            .sum();
        total / self.max_values.len() as f64
    }
}

/// ln P(y* < y) under the independence approximation
fn log_max_cdf(y: f64, mean: &[f64], stddev: &[f64]) -> f64 {
    mean.iter()
        .zip(stddev)
        .map(|(m, s)| normal::log_cdf((y - m) / s))
        .sum()
}

/// Value where the max-value distribution reaches probability `p`
fn max_quantile(p: f64, mean: &[f64], stddev: &[f64]) -> f64 {
    let target = p.ln();
    let max_mean = mean.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max_sd = stddev.iter().copied().fold(MIN_STDDEV, f64::max);
    let mut lo = max_mean - 5.0 * max_sd;
    let mut hi = max_mean + 5.0 * max_sd;
    for _ in 0..QUANTILE_BISECTIONS {
        if log_max_cdf(hi, mean, stddev) >= target {
            break;
        }
        hi += hi - lo;
    }
    for _ in 0..QUANTILE_BISECTIONS {
        if log_max_cdf(lo, mean, stddev) <= target {
            break;
        }
        lo -= hi - lo;
    }
    for _ in 0..QUANTILE_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if log_max_cdf(mid, mean, stddev) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Gumbel approximation to the max-value distribution, sampled `n` times
pub(crate) fn sample_max_values(mean: &[f64], stddev: &[f64], n: usize, rng: &mut StdRng) -> Vec<f64> {
    if mean.is_empty() {
        return vec![0.0; n.max(1)];
    }
    let q25 = max_quantile(0.25, mean, stddev);
    let q50 = max_quantile(0.5, mean, stddev);
    let q75 = max_quantile(0.75, mean, stddev);

    // Gumbel quantile: a − b ln(−ln p)
    let ln_ln_25 = (-(0.25f64).ln()).ln();
    let ln_ln_75 = (-(0.75f64).ln()).ln();
    let b = ((q75 - q25) / (ln_ln_25 - ln_ln_75)).max(MIN_STDDEV);
    let a = q50 + b * (2.0f64.ln()).ln();

    let floor = mean.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (0..n.max(1))
        .map(|_| {
            let u: f64 = rng.random_range(f64::EPSILON..1.0);
            (a - b * (-u.ln()).ln()).max(floor + MIN_STDDEV)
        })
        .collect()
}
