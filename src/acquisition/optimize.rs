//! Restart-based maximization of an acquisition function on an interval
//!
//! Raw candidates from a scrambled Sobol sequence are screened, the best
//! `num_restarts` of them seed golden-section refinements on a local
//! bracket, and the best refined point wins.

use rand::rngs::StdRng;

use super::AcquisitionFunction;
use crate::design::ScrambledSobol;

const GOLDEN: f64 = 0.618_033_988_749_895;
const TOLERANCE: f64 = 1e-7;
const MAX_SECTIONS: usize = 100;

/// Maximize `acquisition` over `bounds`, returning `(best_x, best_value)`
pub fn optimize<A>(
    acquisition: &A,
    bounds: (f64, f64),
    num_restarts: usize,
    raw_samples: usize,
    rng: &mut StdRng,
) -> (f64, f64)
where
    A: AcquisitionFunction + ?Sized,
{
    let (lo, hi) = bounds;
    let width = hi - lo;
    let raw_samples = raw_samples.max(1);

    let mut raw: Vec<(f64, f64)> = ScrambledSobol::new(rng)
        .take_points(raw_samples)
        .into_iter()
        .map(|u| {
            let x = lo + u * width;
            (x, score(acquisition, x))
        })
        .collect();
    raw.sort_by(|a, b| b.1.total_cmp(&a.1));

    let half_bracket = 2.0 * width / raw_samples as f64;
    let mut best = raw[0];
    for &(start, start_value) in raw.iter().take(num_restarts.max(1)) {
        let a = (start - half_bracket).max(lo);
        let b = (start + half_bracket).min(hi);
        let (x, value) = golden_section(acquisition, a, b);
        let refined = if value >= start_value {
            (x, value)
        } else {
            (start, start_value)
        };
        if refined.1 > best.1 {
            best = refined;
        }
    }
    best
}

/// Non-finite scores rank below everything
fn score<A: AcquisitionFunction + ?Sized>(acquisition: &A, x: f64) -> f64 {
    let v = acquisition.evaluate(x);
    if v.is_finite() {
        v
    } else {
        f64::NEG_INFINITY
    }
}

/// Golden-section search for a maximum on `[a, b]`
fn golden_section<A: AcquisitionFunction + ?Sized>(acquisition: &A, mut a: f64, mut b: f64) -> (f64, f64) {
    let mut c = b - GOLDEN * (b - a);
    let mut d = a + GOLDEN * (b - a);
    let mut fc = score(acquisition, c);
    let mut fd = score(acquisition, d);

    for _ in 0..MAX_SECTIONS {
        if (b - a).abs() < TOLERANCE {
            break;
        }
        if fc >= fd {
            b = d;
            d = c;
            fd = fc;
            c = b - GOLDEN * (b - a);
            fc = score(acquisition, c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + GOLDEN * (b - a);
            fd = score(acquisition, d);
        }
    }

    // The bracket ends are candidates too, so maxima on the domain edge are reachable
    [(c, fc), (d, fd), (a, score(acquisition, a)), (b, score(acquisition, b))]
        .into_iter()
        .fold((c, f64::NEG_INFINITY), |best, p| if p.1 > best.1 { p } else { best })
}
