//! YAML schema for a run specification
//!
//! Every field has a default reproducing the reference muscle-contraction
//! study, so an empty document is a valid specification.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete run specification as written in YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSpec {
    /// Surrogate configuration
    pub model: ModelSpec,
    /// Acquisition configuration
    pub acquisition: AcquisitionSpec,
    /// Stopping configuration
    pub stopping: StoppingSpec,
    /// Initial design configuration
    pub design: DesignSpec,
    /// Input domain and calibration target
    pub domain: DomainSpec,
    /// Oracle backing the experiment
    pub oracle: OracleSpec,
    /// Output files
    pub output: OutputSpec,
    /// Render the surrogate after each refit
    pub visualize: bool,
    /// Offer interactive augmentation after the loop stops
    pub interactive: bool,
}

/// Surrogate model choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSpec {
    /// `matern` or `rbf`
    pub kernel: String,
    /// Matérn smoothness (0.5, 1.5 or 2.5)
    pub nu: f64,
    /// `zero` or `constant`
    pub mean: String,
    /// `fixed` or `learned`
    pub noise: String,
    /// Variance used by the fixed-noise model (standardized units)
    pub fixed_noise_variance: f64,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            kernel: "matern".to_string(),
            nu: 1.5,
            mean: "zero".to_string(),
            noise: "learned".to_string(),
            fixed_noise_variance: 1e-6,
        }
    }
}

/// Acquisition choices and optimizer effort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionSpec {
    /// `ei`, `pi`, `kg` or `es`
    pub policy: String,
    /// Local refinements per acquisition maximization
    pub num_restarts: usize,
    /// Raw candidates screened before refinement
    pub raw_samples: usize,
    /// Reference points drawn for max-value entropy search
    pub es_candidates: usize,
    /// Fantasy samples for knowledge gradient
    pub kg_fantasies: usize,
    /// Restarts for knowledge gradient
    pub kg_restarts: usize,
    /// Raw samples for knowledge gradient
    pub kg_raw_samples: usize,
    /// Reduced knowledge-gradient effort for development runs
    pub smoke_test: bool,
}

impl Default for AcquisitionSpec {
    fn default() -> Self {
        Self {
            policy: "ei".to_string(),
            num_restarts: 20,
            raw_samples: 256,
            es_candidates: 1000,
            kg_fantasies: 128,
            kg_restarts: 10,
            kg_raw_samples: 128,
            smoke_test: false,
        }
    }
}

/// Stopping policy and its thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoppingSpec {
    /// `value` (stopping_y) or `spatial` (stopping_xy)
    pub policy: String,
    /// Minimum gain over the best value that counts as improvement
    pub improvement_threshold: f64,
    /// K: consecutive non-improving trials, or neighborhood size
    pub consecutive_trials: usize,
    /// Neighborhood radius in normalized input space
    pub x_range: f64,
    /// Iteration cap applied regardless of policy
    pub max_iterations: usize,
}

impl Default for StoppingSpec {
    fn default() -> Self {
        Self {
            policy: "value".to_string(),
            improvement_threshold: 1e-4,
            consecutive_trials: 3,
            x_range: 5e-2,
            max_iterations: 100,
        }
    }
}

/// Initial design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSpec {
    /// `sobol` or `uniform`
    pub strategy: String,
    /// Number of initial points (at least 2)
    pub initial_points: usize,
    /// Seed for the scrambled sequence and acquisition sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for DesignSpec {
    fn default() -> Self {
        Self {
            strategy: "sobol".to_string(),
            initial_points: 2,
            seed: None,
        }
    }
}

/// Input domain and calibration target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainSpec {
    /// Fixed lower bound of the physical input
    pub lower: f64,
    /// Known upper bound; skips calibration when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    /// Lower edge of the calibration target interval
    pub ratio_min: f64,
    /// Upper edge of the calibration target interval
    pub ratio_max: f64,
    /// First upper-bound guess
    pub initial_guess: f64,
    /// Calibration step budget
    pub max_calibration_steps: usize,
}

impl Default for DomainSpec {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: None,
            ratio_min: 1.5,
            ratio_max: 1.6,
            initial_guess: 10.0,
            max_calibration_steps: 60,
        }
    }
}

/// Oracle backing a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OracleSpec {
    /// Analytic quadratic `a·x² + b·x` with metric `x / metric_scale`
    Quadratic {
        #[serde(default = "default_quadratic_a")]
        a: f64,
        #[serde(default = "default_quadratic_b")]
        b: f64,
        #[serde(default = "default_metric_scale")]
        metric_scale: f64,
    },
    /// External simulation processes
    Process(ProcessSpec),
}

impl Default for OracleSpec {
    fn default() -> Self {
        OracleSpec::Quadratic {
            a: default_quadratic_a(),
            b: default_quadratic_b(),
            metric_scale: default_metric_scale(),
        }
    }
}

fn default_quadratic_a() -> f64 {
    -0.001678
}

fn default_quadratic_b() -> f64 {
    0.05034
}

fn default_metric_scale() -> f64 {
    10.0
}

/// External simulation launch description
///
/// Arguments may contain `{x}` (physical input) and `{tag}` (per-evaluation
/// token). Output files are `<prefix><tag>.csv` inside `working_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Simulation executable
    pub program: String,
    /// Simulation arguments
    #[serde(default)]
    pub args: Vec<String>,
    /// Calibration executable (tensile test)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration_program: Option<String>,
    /// Calibration arguments
    #[serde(default)]
    pub calibration_args: Vec<String>,
    /// Directory the processes run in and write their outputs to
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
    /// Prefix of the contraction output file
    #[serde(default = "default_contraction_prefix")]
    pub contraction_prefix: String,
    /// Prefix of the prestretch output file
    #[serde(default = "default_prestretch_prefix")]
    pub prestretch_prefix: String,
}

fn default_working_dir() -> PathBuf {
    PathBuf::from("build_release")
}

fn default_contraction_prefix() -> String {
    "muscle_length_contraction".to_string()
}

fn default_prestretch_prefix() -> String {
    "muscle_length_prestretch".to_string()
}

/// Output files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSpec {
    /// Directory receiving the trial log and registry
    pub dir: PathBuf,
    /// Trial log file name prefix (identity and `.csv` are appended)
    pub log_prefix: String,
    /// Registry file shared by all runs
    pub registry: String,
    /// Points in the final posterior query grid
    pub grid_points: usize,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            log_prefix: "BayesOpt_outputs".to_string(),
            registry: "BayesOpt_global_individuality_parameters.csv".to_string(),
            grid_points: 1000,
        }
    }
}
