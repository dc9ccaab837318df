//! Initial design sequences in [0, 1]

use rand::Rng;

/// Evenly spaced grid including both endpoints
pub fn uniform_grid(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (n - 1) as f64;
            (0..n).map(|i| i as f64 / last).collect()
        }
    }
}

/// Evenly spaced grid over `[lower, upper]`, endpoints included
pub fn linspace(lower: f64, upper: f64, n: usize) -> Vec<f64> {
    uniform_grid(n)
        .into_iter()
        .map(|t| lower + t * (upper - lower))
        .collect()
}

const BITS: usize = 32;
const SCALE: f64 = 4_294_967_296.0; // 2^32

/// Scrambled one-dimensional Sobol sequence
///
/// In one dimension the Sobol sequence is the base-2 van der Corput
/// sequence. Points are scrambled with a random lower-triangular linear
/// matrix followed by a random digital shift. Both transforms are bijective
/// on 32-bit digit vectors, so distinct indices give distinct points.
#[derive(Debug, Clone)]
pub struct ScrambledSobol {
    /// Row k holds the matrix row for output digit k (most significant first)
    matrix: [u32; BITS],
    shift: u32,
    index: u32,
}

impl ScrambledSobol {
    /// Draw a scramble from `rng`
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut matrix = [0u32; BITS];
        for (k, row) in matrix.iter_mut().enumerate() {
            let diagonal = 1u32 << (BITS - 1 - k);
            let strictly_above = if k == 0 { 0 } else { u32::MAX << (BITS - k) };
            *row = (rng.random::<u32>() & strictly_above) | diagonal;
        }
        Self {
            matrix,
            shift: rng.random(),
            index: 0,
        }
    }

    /// Unscrambled sequence, for reference
    pub fn unscrambled() -> Self {
        let mut matrix = [0u32; BITS];
        for (k, row) in matrix.iter_mut().enumerate() {
            *row = 1u32 << (BITS - 1 - k);
        }
        Self {
            matrix,
            shift: 0,
            index: 0,
        }
    }

    fn scramble(&self, digits: u32) -> u32 {
        let mut out = 0u32;
        for (k, row) in self.matrix.iter().enumerate() {
            let bit = (row & digits).count_ones() & 1;
            out |= bit << (BITS - 1 - k);
        }
        out ^ self.shift
    }

    /// Next `n` points
    pub fn take_points(&mut self, n: usize) -> Vec<f64> {
        self.by_ref().take(n).collect()
    }
}

impl Iterator for ScrambledSobol {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let digits = self.index.reverse_bits();
        self.index = self.index.checked_add(1)?;
        Some(f64::from(self.scramble(digits)) / SCALE)
    }
}
