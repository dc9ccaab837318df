//! Trials, the design history, and the initial design

mod history;
mod initializer;
mod sequence;

pub use history::{DesignHistory, Trial};
pub use initializer::DesignInitializer;
pub use sequence::{linspace, uniform_grid, ScrambledSobol};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random source for a run: reproducible when seeded, OS entropy otherwise
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
