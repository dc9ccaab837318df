//! Standard normal density and distribution helpers

use std::f64::consts::{FRAC_1_SQRT_2, PI};

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Density φ(z)
pub fn pdf(z: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * z * z).exp()
}

/// Distribution Φ(z), accurate in both tails
pub fn cdf(z: f64) -> f64 {
    0.5 * libm::erfc(-z * FRAC_1_SQRT_2)
}

/// ln Φ(z), switching to the asymptotic series deep in the lower tail
pub fn log_cdf(z: f64) -> f64 {
    if z > -30.0 {
        cdf(z).ln()
    } else {
        -0.5 * z * z - (-z).ln() - 0.5 * (2.0 * PI).ln() + tail_series(z).ln()
    }
}

/// φ(z) / Φ(z)
pub fn inverse_mills(z: f64) -> f64 {
    if z > -30.0 {
        pdf(z) / cdf(z)
    } else {
        -z / tail_series(z)
    }
}

/// Leading terms of the Mills ratio expansion `1 − 1/z² + 3/z⁴`
fn tail_series(z: f64) -> f64 {
    let z2 = z * z;
    1.0 - 1.0 / z2 + 3.0 / (z2 * z2)
}
