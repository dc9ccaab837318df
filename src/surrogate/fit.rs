//! Marginal-likelihood hyperparameter search
//!
//! Hyperparameters live in log space inside fixed boxes. A coarse grid picks
//! the starting point and a bounded Nelder-Mead simplex refines it.

use nalgebra::{Cholesky, DVector, Dyn};

use super::kernel::Kernel;
use crate::config::{KernelKind, MeanKind};

/// Lengthscale box, in normalized input units
pub(crate) const LENGTHSCALE_BOUNDS: (f64, f64) = (0.01, 10.0);
/// Output-scale box, in standardized output units
pub(crate) const OUTPUTSCALE_BOUNDS: (f64, f64) = (0.05, 20.0);
/// Learned noise box, in standardized output units
pub(crate) const NOISE_BOUNDS: (f64, f64) = (1e-4, 1.0);

const JITTER_LADDER: [f64; 7] = [1e-10, 1e-9, 1e-8, 1e-7, 1e-6, 1e-5, 1e-4];
const GRID_LENGTHSCALES: usize = 12;
const GRID_OUTPUTSCALES: usize = 6;
const GRID_NOISES: usize = 5;
const SIMPLEX_ITERATIONS: usize = 200;
const SIMPLEX_TOLERANCE: f64 = 1e-9;
const LN_2PI: f64 = 1.837_877_066_409_345_3;

/// Fitted quantities for one hyperparameter setting
pub(crate) struct Evaluation {
    pub kernel: Kernel,
    pub noise: f64,
    pub constant: f64,
    pub cholesky: Cholesky<f64, Dyn>,
    pub alpha: DVector<f64>,
    pub log_likelihood: f64,
}

/// Factor `K + noise·I`, climbing the jitter ladder on failure
pub(crate) fn robust_cholesky(kernel: &Kernel, xs: &[f64], noise: f64) -> Option<Cholesky<f64, Dyn>> {
    let mut k = kernel.matrix(xs);
    for i in 0..xs.len() {
        k[(i, i)] += noise;
    }
    if let Some(chol) = Cholesky::new(k.clone()) {
        return Some(chol);
    }
    for jitter in JITTER_LADDER {
        let mut jittered = k.clone();
        for i in 0..xs.len() {
            jittered[(i, i)] += jitter;
        }
        if let Some(chol) = Cholesky::new(jittered) {
            tracing::debug!(jitter, "Cholesky needed jitter");
            return Some(chol);
        }
    }
    None
}

/// Exact log marginal likelihood of standardized targets `ys`
pub(crate) fn evaluate(
    kernel: Kernel,
    mean: MeanKind,
    noise: f64,
    xs: &[f64],
    ys: &[f64],
) -> Option<Evaluation> {
    let n = xs.len();
    let cholesky = robust_cholesky(&kernel, xs, noise)?;
    let y = DVector::from_column_slice(ys);

    let constant = match mean {
        MeanKind::Zero => 0.0,
        MeanKind::Constant => {
            // Generalized least squares estimate of the constant
            let ones = DVector::from_element(n, 1.0);
            let k_inv_ones = cholesky.solve(&ones);
            let denom = ones.dot(&k_inv_ones);
            if denom.abs() < f64::MIN_POSITIVE {
                0.0
            } else {
                k_inv_ones.dot(&y) / denom
            }
        }
    };

    let residual = y.add_scalar(-constant);
    let alpha = cholesky.solve(&residual);
    let log_det_half: f64 = cholesky.l_dirty().diagonal().iter().map(|d| d.ln()).sum();
    let log_likelihood = -0.5 * residual.dot(&alpha) - log_det_half - 0.5 * n as f64 * LN_2PI;

    log_likelihood.is_finite().then_some(Evaluation {
        kernel,
        noise,
        constant,
        cholesky,
        alpha,
        log_likelihood,
    })
}

/// Search space for one fit
pub(crate) struct Search<'a> {
    pub kind: KernelKind,
    pub mean: MeanKind,
    /// `Some` for a fixed noise variance, `None` to learn it
    pub fixed_noise: Option<f64>,
    pub xs: &'a [f64],
    pub ys: &'a [f64],
}

impl Search<'_> {
    fn bounds(&self) -> Vec<(f64, f64)> {
        let mut bounds = vec![log_box(LENGTHSCALE_BOUNDS), log_box(OUTPUTSCALE_BOUNDS)];
        if self.fixed_noise.is_none() {
            bounds.push(log_box(NOISE_BOUNDS));
        }
        bounds
    }

    fn decode(&self, theta: &[f64]) -> (Kernel, f64) {
        let kernel = Kernel::new(self.kind, theta[0].exp(), theta[1].exp());
        let noise = match self.fixed_noise {
            Some(v) => v,
            None => theta[2].exp(),
        };
        (kernel, noise)
    }

    fn objective(&self, theta: &[f64]) -> f64 {
        let (kernel, noise) = self.decode(theta);
        evaluate(kernel, self.mean, noise, self.xs, self.ys)
            .map(|e| -e.log_likelihood)
            .unwrap_or(f64::INFINITY)
    }

    fn grid_start(&self) -> Vec<f64> {
        let bounds = self.bounds();
        let axes: Vec<Vec<f64>> = bounds
            .iter()
            .enumerate()
            .map(|(i, &(lo, hi))| {
                let n = match i {
                    0 => GRID_LENGTHSCALES,
                    1 => GRID_OUTPUTSCALES,
                    _ => GRID_NOISES,
                };
                (0..n).map(|k| lo + (hi - lo) * k as f64 / (n - 1) as f64).collect()
            })
            .collect();

        let mut best = bounds.iter().map(|(lo, hi)| 0.5 * (lo + hi)).collect::<Vec<_>>();
        let mut best_value = self.objective(&best);
        let mut theta = vec![0.0; axes.len()];
        let mut index = vec![0usize; axes.len()];
        loop {
            for (d, &i) in index.iter().enumerate() {
                theta[d] = axes[d][i];
            }
            let value = self.objective(&theta);
            if value < best_value {
                best_value = value;
                best.clone_from(&theta);
            }
            // Odometer increment over the grid axes
            let mut d = 0;
            loop {
                if d == index.len() {
                    return best;
                }
                index[d] += 1;
                if index[d] < axes[d].len() {
                    break;
                }
                index[d] = 0;
                d += 1;
            }
        }
    }

    /// Maximize the marginal likelihood
    pub fn run(&self) -> Option<Evaluation> {
        let bounds = self.bounds();
        let start = self.grid_start();
        let theta = nelder_mead(|t| self.objective(t), &start, &bounds);
        let (kernel, noise) = self.decode(&theta);
        evaluate(kernel, self.mean, noise, self.xs, self.ys).or_else(|| {
            let (kernel, noise) = self.decode(&start);
            evaluate(kernel, self.mean, noise, self.xs, self.ys)
        })
    }
}

fn log_box((lo, hi): (f64, f64)) -> (f64, f64) {
    (lo.ln(), hi.ln())
}

fn clamp_into(point: &mut [f64], bounds: &[(f64, f64)]) {
    for (v, &(lo, hi)) in point.iter_mut().zip(bounds) {
        *v = v.clamp(lo, hi);
    }
}

/// Bounded Nelder-Mead minimization; returns the best vertex
pub(crate) fn nelder_mead<F>(f: F, start: &[f64], bounds: &[(f64, f64)]) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let dim = start.len();
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(dim + 1);
    simplex.push((start.to_vec(), f(start)));
    for d in 0..dim {
        let mut vertex = start.to_vec();
        let (lo, hi) = bounds[d];
        let step = 0.1 * (hi - lo);
        vertex[d] = if vertex[d] + step <= hi {
            vertex[d] + step
        } else {
            vertex[d] - step
        };
        clamp_into(&mut vertex, bounds);
        let value = f(&vertex);
        simplex.push((vertex, value));
    }

    for _ in 0..SIMPLEX_ITERATIONS {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        let best = simplex[0].1;
        let worst = simplex[dim].1;
        if (worst - best).abs() <= SIMPLEX_TOLERANCE * (1.0 + best.abs()) {
            break;
        }

        let centroid: Vec<f64> = (0..dim)
            .map(|d| simplex[..dim].iter().map(|(v, _)| v[d]).sum::<f64>() / dim as f64)
            .collect();
        let worst_vertex = simplex[dim].0.clone();
        let along = |t: f64| -> Vec<f64> {
            let mut p: Vec<f64> = centroid
                .iter()
                .zip(&worst_vertex)
                .map(|(c, w)| c + t * (w - c))
                .collect();
            clamp_into(&mut p, bounds);
            p
        };

        let reflected = along(-1.0);
        let reflected_value = f(&reflected);
        if reflected_value < best {
            let expanded = along(-2.0);
            let expanded_value = f(&expanded);
            simplex[dim] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
            continue;
        }
        if reflected_value < simplex[dim - 1].1 {
            simplex[dim] = (reflected, reflected_value);
            continue;
        }

        let contracted = if reflected_value < worst {
            along(-0.5)
        } else {
            along(0.5)
        };
        let contracted_value = f(&contracted);
        if contracted_value < worst.min(reflected_value) {
            simplex[dim] = (contracted, contracted_value);
            continue;
        }

        // Shrink toward the best vertex
        let anchor = simplex[0].0.clone();
        for (vertex, value) in simplex.iter_mut().skip(1) {
            for (v, a) in vertex.iter_mut().zip(&anchor) {
                *v = a + 0.5 * (*v - a);
            }
            *value = f(vertex);
        }
    }

    simplex
        .into_iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(v, _)| v)
        .unwrap_or_else(|| start.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_nelder_mead_quadratic_bowl() {
        let f = |t: &[f64]| (t[0] - 1.0).powi(2) + 2.0 * (t[1] + 0.5).powi(2);
        let x = nelder_mead(f, &[0.0, 0.0], &[(-5.0, 5.0), (-5.0, 5.0)]);
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(x[1], -0.5, epsilon = 1e-3);
    }

    #[test]
    fn test_nelder_mead_respects_bounds() {
        let f = |t: &[f64]| (t[0] - 10.0).powi(2);
        let x = nelder_mead(f, &[0.0], &[(-1.0, 2.0)]);
        assert!(x[0] <= 2.0);
        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_constant_mean_recovers_offset() {
        let xs = [0.0, 0.5, 1.0];
        let ys = [2.0, 2.0, 2.0];
        let kernel = Kernel::new(KernelKind::Matern { nu: 1.5 }, 0.2, 1.0);
        let eval = evaluate(kernel, MeanKind::Constant, 1e-6, &xs, &ys).unwrap();
        assert_abs_diff_eq!(eval.constant, 2.0, epsilon = 1e-9);
        assert!(eval.alpha.iter().all(|a| a.abs() < 1e-6));
    }

    #[test]
    fn test_likelihood_prefers_true_lengthscale_order() {
        // Smooth data should be more likely under a long lengthscale than a tiny one
        let xs: Vec<f64> = (0..8).map(|i| i as f64 / 7.0).collect();
        let ys: Vec<f64> = xs.iter().map(|x| (2.0 * x).sin()).collect();
        let ll = |l: f64| {
            let k = Kernel::new(KernelKind::Rbf, l, 1.0);
            evaluate(k, MeanKind::Zero, 1e-4, &xs, &ys).unwrap().log_likelihood
        };
        assert!(ll(0.5) > ll(0.02));
    }

    #[test]
    fn test_robust_cholesky_handles_duplicate_inputs() {
        let kernel = Kernel::new(KernelKind::Rbf, 0.3, 1.0);
        let xs = [0.2, 0.2, 0.7];
        assert!(robust_cholesky(&kernel, &xs, 0.0).is_some());
    }
}
