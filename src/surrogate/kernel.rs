//! Stationary covariance functions on the unit interval

use nalgebra::{DMatrix, DVector};

use crate::config::KernelKind;

const SQRT_3: f64 = 1.732_050_807_568_877_2;
const SQRT_5: f64 = 2.236_067_977_499_79;

/// Scaled kernel `outputscale · k(|a − b| / lengthscale)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    pub kind: KernelKind,
    pub lengthscale: f64,
    pub outputscale: f64,
}

impl Kernel {
    pub fn new(kind: KernelKind, lengthscale: f64, outputscale: f64) -> Self {
        Self {
            kind,
            lengthscale,
            outputscale,
        }
    }

    /// Covariance between two inputs
    pub fn eval(&self, a: f64, b: f64) -> f64 {
        let r = (a - b).abs() / self.lengthscale;
        self.outputscale * correlation(self.kind, r)
    }

    /// Gram matrix `K(xs, xs)`
    pub fn matrix(&self, xs: &[f64]) -> DMatrix<f64> {
        let n = xs.len();
        DMatrix::from_fn(n, n, |i, j| self.eval(xs[i], xs[j]))
    }

    /// Cross-covariance vector `k(x, xs)`
    pub fn vector(&self, x: f64, xs: &[f64]) -> DVector<f64> {
        DVector::from_fn(xs.len(), |i, _| self.eval(x, xs[i]))
    }
}

/// Unit-variance correlation at scaled distance `r`
fn correlation(kind: KernelKind, r: f64) -> f64 {
    match kind {
        KernelKind::Rbf => (-0.5 * r * r).exp(),
        KernelKind::Matern { nu } if nu < 1.0 => (-r).exp(),
        KernelKind::Matern { nu } if nu < 2.0 => {
            let s = SQRT_3 * r;
            (1.0 + s) * (-s).exp()
        }
        KernelKind::Matern { .. } => {
            let s = SQRT_5 * r;
            (1.0 + s + s * s / 3.0) * (-s).exp()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const KINDS: [KernelKind; 4] = [
        KernelKind::Matern { nu: 0.5 },
        KernelKind::Matern { nu: 1.5 },
        KernelKind::Matern { nu: 2.5 },
        KernelKind::Rbf,
    ];

    #[test]
    fn test_unit_correlation_at_zero_distance() {
        for kind in KINDS {
            let k = Kernel::new(kind, 0.3, 2.0);
            assert_abs_diff_eq!(k.eval(0.4, 0.4), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_decreasing_with_distance() {
        for kind in KINDS {
            let k = Kernel::new(kind, 0.2, 1.0);
            let near = k.eval(0.0, 0.1);
            let far = k.eval(0.0, 0.5);
            assert!(near > far, "{kind:?}");
            assert!(far > 0.0);
        }
    }

    #[test]
    fn test_known_values() {
        let k = Kernel::new(KernelKind::Matern { nu: 0.5 }, 1.0, 1.0);
        assert_abs_diff_eq!(k.eval(0.0, 1.0), (-1.0f64).exp(), epsilon = 1e-12);
        let k = Kernel::new(KernelKind::Rbf, 1.0, 1.0);
        assert_abs_diff_eq!(k.eval(0.0, 1.0), (-0.5f64).exp(), epsilon = 1e-12);
        let k = Kernel::new(KernelKind::Matern { nu: 1.5 }, 1.0, 1.0);
        let s = 3f64.sqrt();
        assert_abs_diff_eq!(k.eval(0.0, 1.0), (1.0 + s) * (-s).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let k = Kernel::new(KernelKind::Matern { nu: 2.5 }, 0.25, 1.5);
        let xs = [0.0, 0.3, 0.9];
        let m = k.matrix(&xs);
        assert_eq!(m.nrows(), 3);
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(m[(i, j)], m[(j, i)], epsilon = 1e-15);
            }
        }
        let v = k.vector(0.3, &xs);
        assert_abs_diff_eq!(v[1], 1.5, epsilon = 1e-12);
    }
}
