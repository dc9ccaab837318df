//! Run identity token
//!
//! Tags output files with the configuration that produced them, e.g.
//! `_matern_1.5_zero_variable_noise_ES_stopping_xy`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::policy::{AcquisitionKind, KernelKind, MeanKind, NoiseKind, StoppingKind};
use super::resolved::SurrogateConfig;

/// Immutable token derived from the resolved configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunIdentity(String);

impl RunIdentity {
    /// Build the identity from resolved policy choices
    pub fn new(
        surrogate: &SurrogateConfig,
        acquisition: AcquisitionKind,
        stopping: StoppingKind,
    ) -> Self {
        let mut token = String::new();
        match surrogate.kernel {
            KernelKind::Matern { nu } => token.push_str(&format!("_matern_{nu:?}")),
            KernelKind::Rbf => token.push_str("_rbf"),
        }
        token.push_str(match surrogate.mean {
            MeanKind::Constant => "_const",
            MeanKind::Zero => "_zero",
        });
        token.push_str(match surrogate.noise {
            NoiseKind::Fixed { .. } => "_fixed_noise",
            NoiseKind::Learned => "_variable_noise",
        });
        token.push('_');
        token.push_str(acquisition.tag());
        token.push('_');
        token.push_str(stopping.tag());
        Self(token)
    }

    /// Token as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
