//! Policy selections and their fallback resolution
//!
//! The YAML schema carries policy choices as plain strings so that an
//! unrecognized or contradictory value never aborts a run. Each `parse`
//! function maps the string to one enum case, or to the documented default
//! with a `tracing` warning naming both the rejected value and the substitute.

use serde::{Deserialize, Serialize};

/// Matérn smoothness values with a closed-form kernel
pub const SUPPORTED_NU: [f64; 3] = [0.5, 1.5, 2.5];

/// Default Matérn smoothness
pub const DEFAULT_NU: f64 = 1.5;

/// Covariance function of the surrogate (always wrapped with an output scale)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum KernelKind {
    /// Matérn kernel with smoothness `nu`
    Matern { nu: f64 },
    /// Squared-exponential kernel
    Rbf,
}

impl KernelKind {
    /// Resolve a kernel name and smoothness, falling back to Matérn ν=1.5
    pub fn parse(name: &str, nu: f64) -> Self {
        match normalize(name).as_str() {
            "matern" => {
                if SUPPORTED_NU.iter().any(|v| (v - nu).abs() < 1e-12) {
                    KernelKind::Matern { nu }
                } else {
                    tracing::warn!(
                        nu,
                        "Unsupported Matérn smoothness {nu}, used Matern Kernel with nu=1.5 instead"
                    );
                    KernelKind::Matern { nu: DEFAULT_NU }
                }
            }
            "rbf" | "smooth" | "squared_exponential" | "se" => KernelKind::Rbf,
            other => {
                tracing::warn!(
                    kernel = other,
                    "Wrong kernel '{other}', used Matern Kernel with nu=1.5 instead"
                );
                KernelKind::Matern { nu: DEFAULT_NU }
            }
        }
    }
}

/// Prior mean of the surrogate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeanKind {
    Zero,
    Constant,
}

impl MeanKind {
    /// Resolve a mean name, falling back to a constant mean
    pub fn parse(name: &str) -> Self {
        match normalize(name).as_str() {
            "zero" => MeanKind::Zero,
            "constant" | "const" => MeanKind::Constant,
            other => {
                tracing::warn!(mean = other, "Wrong mean '{other}', used Constant Mean instead");
                MeanKind::Constant
            }
        }
    }
}

/// Observation noise model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoiseKind {
    /// Known homoscedastic variance (in standardized output units)
    Fixed { variance: f64 },
    /// Noise variance learned by marginal likelihood
    Learned,
}

impl NoiseKind {
    /// Resolve a noise name, falling back to learned noise
    pub fn parse(name: &str, fixed_variance: f64) -> Self {
        match normalize(name).as_str() {
            "fixed" | "fixed_noise" => NoiseKind::Fixed {
                variance: fixed_variance,
            },
            "learned" | "variable" | "variable_noise" => NoiseKind::Learned,
            other => {
                tracing::warn!(noise = other, "Wrong noise '{other}', used variable noise instead");
                NoiseKind::Learned
            }
        }
    }
}

/// Active acquisition policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionKind {
    ExpectedImprovement,
    ProbabilityOfImprovement,
    KnowledgeGradient,
    MaxValueEntropy,
}

impl AcquisitionKind {
    /// Resolve an acquisition name, falling back to Expected Improvement
    pub fn parse(name: &str) -> Self {
        match normalize(name).as_str() {
            "ei" | "expected_improvement" => AcquisitionKind::ExpectedImprovement,
            "pi" | "probability_of_improvement" => AcquisitionKind::ProbabilityOfImprovement,
            "kg" | "knowledge_gradient" => AcquisitionKind::KnowledgeGradient,
            "es" | "mes" | "entropy_search" | "max_value_entropy" => {
                AcquisitionKind::MaxValueEntropy
            }
            other => {
                tracing::warn!(
                    acquisition = other,
                    "Wrong acquisition '{other}', used Expected Improvement instead"
                );
                AcquisitionKind::ExpectedImprovement
            }
        }
    }

    /// Short tag used in run identities
    pub fn tag(&self) -> &'static str {
        match self {
            AcquisitionKind::ExpectedImprovement => "EI",
            AcquisitionKind::ProbabilityOfImprovement => "PI",
            AcquisitionKind::KnowledgeGradient => "KG",
            AcquisitionKind::MaxValueEntropy => "ES",
        }
    }
}

/// Active stopping policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoppingKind {
    /// Stop after K consecutive non-improving trials
    ValueBased,
    /// Stop once K trials cluster around the best observation
    SpatialDensity,
}

impl StoppingKind {
    /// Resolve a stopping policy name, falling back to value-based stopping
    pub fn parse(name: &str) -> Self {
        match normalize(name).as_str() {
            "value" | "value_based" | "stopping_y" | "y" => StoppingKind::ValueBased,
            "spatial" | "spatial_density" | "stopping_xy" | "xy" => StoppingKind::SpatialDensity,
            other => {
                tracing::warn!(
                    stopping = other,
                    "Wrong stopping policy '{other}', used stopping_y instead"
                );
                StoppingKind::ValueBased
            }
        }
    }

    /// Short tag used in run identities
    pub fn tag(&self) -> &'static str {
        match self {
            StoppingKind::ValueBased => "stopping_y",
            StoppingKind::SpatialDensity => "stopping_xy",
        }
    }
}

/// Initial design strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignStrategy {
    /// Scrambled Sobol points
    Sobol,
    /// Evenly spaced grid including both endpoints
    Uniform,
}

impl DesignStrategy {
    /// Resolve a design strategy name, falling back to Sobol
    pub fn parse(name: &str) -> Self {
        match normalize(name).as_str() {
            "sobol" | "quasi_random" => DesignStrategy::Sobol,
            "uniform" | "grid" | "linspace" => DesignStrategy::Uniform,
            other => {
                tracing::warn!(design = other, "Wrong design strategy '{other}', used Sobol instead");
                DesignStrategy::Sobol
            }
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace(['-', ' '], "_")
}
