//! Validation error types

/// Validation error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid number of initial points: {0} (must be >= 2)")]
    TooFewInitialPoints(usize),

    #[error("Invalid calibration interval: [{0}, {1}] (ratio_min must be <= ratio_max)")]
    EmptyRatioInterval(f64, f64),

    #[error("Invalid initial guess: {guess} (must be > lower bound {lower})")]
    InvalidInitialGuess { guess: f64, lower: f64 },

    #[error("Invalid upper bound: {upper} (must be > lower bound {lower})")]
    InvalidUpperBound { upper: f64, lower: f64 },

    #[error("Invalid improvement threshold: {0} (must be >= 0.0)")]
    InvalidImprovementThreshold(f64),

    #[error("Invalid consecutive trials: {0} (must be > 0)")]
    InvalidConsecutiveTrials(usize),

    #[error("Invalid x_range: {0} (must be in (0.0, 1.0])")]
    InvalidXRange(f64),

    #[error("Invalid fixed noise variance: {0} (must be > 0.0)")]
    InvalidNoiseVariance(f64),

    #[error("Invalid optimizer effort: {field} = 0 (must be > 0)")]
    ZeroEffort { field: &'static str },

    #[error("Invalid query grid size: {0} (must be >= 2)")]
    InvalidGridSize(usize),

    #[error("Invalid calibration step budget: 0 (must be > 0)")]
    ZeroCalibrationSteps,

    #[error("Non-finite value for {0}")]
    NonFinite(&'static str),
}
