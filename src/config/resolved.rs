//! Resolved, immutable run configuration
//!
//! [`RunConfig`] is built once from a validated [`RunSpec`] and then shared by
//! reference with every component. All policy strings are resolved here.

use serde::Serialize;

use super::identity::RunIdentity;
use super::policy::{
    AcquisitionKind, DesignStrategy, KernelKind, MeanKind, NoiseKind, StoppingKind,
};
use super::schema::{OracleSpec, OutputSpec, RunSpec};

/// Surrogate model configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurrogateConfig {
    pub kernel: KernelKind,
    pub mean: MeanKind,
    pub noise: NoiseKind,
}

impl Default for SurrogateConfig {
    fn default() -> Self {
        Self {
            kernel: KernelKind::Matern { nu: 1.5 },
            mean: MeanKind::Zero,
            noise: NoiseKind::Learned,
        }
    }
}

/// Optimizer effort for one acquisition maximization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptimizerEffort {
    pub num_restarts: usize,
    pub raw_samples: usize,
}

/// Knowledge-gradient effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KnowledgeGradientEffort {
    pub fantasies: usize,
    pub optimizer: OptimizerEffort,
}

impl KnowledgeGradientEffort {
    /// Reduced effort for development and test runs
    pub fn smoke_test(raw_samples: usize) -> Self {
        Self {
            fantasies: 4,
            optimizer: OptimizerEffort {
                num_restarts: 2,
                raw_samples,
            },
        }
    }
}

/// Acquisition configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcquisitionConfig {
    pub kind: AcquisitionKind,
    pub optimizer: OptimizerEffort,
    pub es_candidates: usize,
    pub knowledge_gradient: KnowledgeGradientEffort,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            kind: AcquisitionKind::ExpectedImprovement,
            optimizer: OptimizerEffort {
                num_restarts: 20,
                raw_samples: 256,
            },
            es_candidates: 1000,
            knowledge_gradient: KnowledgeGradientEffort {
                fantasies: 128,
                optimizer: OptimizerEffort {
                    num_restarts: 10,
                    raw_samples: 128,
                },
            },
        }
    }
}

/// Stopping configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoppingConfig {
    pub kind: StoppingKind,
    pub improvement_threshold: f64,
    pub consecutive_trials: usize,
    pub x_range: f64,
    pub max_iterations: usize,
}

impl Default for StoppingConfig {
    fn default() -> Self {
        Self {
            kind: StoppingKind::ValueBased,
            improvement_threshold: 1e-4,
            consecutive_trials: 3,
            x_range: 5e-2,
            max_iterations: 100,
        }
    }
}

/// Initial design configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DesignConfig {
    pub strategy: DesignStrategy,
    pub initial_points: usize,
    pub seed: Option<u64>,
}

/// Calibration configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationConfig {
    pub lower: f64,
    pub fixed_upper: Option<f64>,
    pub ratio_min: f64,
    pub ratio_max: f64,
    pub initial_guess: f64,
    pub max_steps: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            lower: 0.0,
            fixed_upper: None,
            ratio_min: 1.5,
            ratio_max: 1.6,
            initial_guess: 10.0,
            max_steps: 60,
        }
    }
}

/// Fully resolved run configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub surrogate: SurrogateConfig,
    pub acquisition: AcquisitionConfig,
    pub stopping: StoppingConfig,
    pub design: DesignConfig,
    pub calibration: CalibrationConfig,
    pub oracle: OracleSpec,
    pub output: OutputSpec,
    pub visualize: bool,
    pub interactive: bool,
    pub identity: RunIdentity,
}

impl RunConfig {
    /// Resolve a specification, substituting defaults for invalid choices
    pub fn resolve(spec: &RunSpec) -> Self {
        let surrogate = SurrogateConfig {
            kernel: KernelKind::parse(&spec.model.kernel, spec.model.nu),
            mean: MeanKind::parse(&spec.model.mean),
            noise: NoiseKind::parse(&spec.model.noise, spec.model.fixed_noise_variance),
        };

        let smoke_test = spec.acquisition.smoke_test || std::env::var_os("SMOKE_TEST").is_some();
        let knowledge_gradient = if smoke_test {
            KnowledgeGradientEffort::smoke_test(spec.acquisition.kg_raw_samples)
        } else {
            KnowledgeGradientEffort {
                fantasies: spec.acquisition.kg_fantasies,
                optimizer: OptimizerEffort {
                    num_restarts: spec.acquisition.kg_restarts,
                    raw_samples: spec.acquisition.kg_raw_samples,
                },
            }
        };
        let acquisition = AcquisitionConfig {
            kind: AcquisitionKind::parse(&spec.acquisition.policy),
            optimizer: OptimizerEffort {
                num_restarts: spec.acquisition.num_restarts,
                raw_samples: spec.acquisition.raw_samples,
            },
            es_candidates: spec.acquisition.es_candidates,
            knowledge_gradient,
        };

        let stopping = StoppingConfig {
            kind: StoppingKind::parse(&spec.stopping.policy),
            improvement_threshold: spec.stopping.improvement_threshold,
            consecutive_trials: spec.stopping.consecutive_trials,
            x_range: spec.stopping.x_range,
            max_iterations: spec.stopping.max_iterations,
        };

        let design = DesignConfig {
            strategy: DesignStrategy::parse(&spec.design.strategy),
            initial_points: spec.design.initial_points,
            seed: spec.design.seed,
        };

        let calibration = CalibrationConfig {
            lower: spec.domain.lower,
            fixed_upper: spec.domain.upper,
            ratio_min: spec.domain.ratio_min,
            ratio_max: spec.domain.ratio_max,
            initial_guess: spec.domain.initial_guess,
            max_steps: spec.domain.max_calibration_steps,
        };

        let identity = RunIdentity::new(&surrogate, acquisition.kind, stopping.kind);

        Self {
            surrogate,
            acquisition,
            stopping,
            design,
            calibration,
            oracle: spec.oracle.clone(),
            output: spec.output.clone(),
            visualize: spec.visualize,
            interactive: spec.interactive,
            identity,
        }
    }
}
