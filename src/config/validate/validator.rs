//! Run specification validation logic

use super::error::ValidationError;
use crate::config::schema::RunSpec;

/// Validate a run specification
///
/// Checks:
/// - Numeric values are finite and in valid ranges
/// - The calibration interval and domain are non-empty
/// - Optimizer effort counts are positive
pub fn validate_spec(spec: &RunSpec) -> Result<(), ValidationError> {
    let finite = [
        ("domain.lower", spec.domain.lower),
        ("domain.ratio_min", spec.domain.ratio_min),
        ("domain.ratio_max", spec.domain.ratio_max),
        ("domain.initial_guess", spec.domain.initial_guess),
        ("stopping.improvement_threshold", spec.stopping.improvement_threshold),
        ("stopping.x_range", spec.stopping.x_range),
        ("model.fixed_noise_variance", spec.model.fixed_noise_variance),
        ("model.nu", spec.model.nu),
    ];
    for (name, value) in finite {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite(name));
        }
    }

    if spec.design.initial_points < 2 {
        return Err(ValidationError::TooFewInitialPoints(spec.design.initial_points));
    }

    if spec.domain.ratio_min > spec.domain.ratio_max {
        return Err(ValidationError::EmptyRatioInterval(
            spec.domain.ratio_min,
            spec.domain.ratio_max,
        ));
    }

    if spec.domain.initial_guess <= spec.domain.lower {
        return Err(ValidationError::InvalidInitialGuess {
            guess: spec.domain.initial_guess,
            lower: spec.domain.lower,
        });
    }

    if let Some(upper) = spec.domain.upper {
        if !upper.is_finite() {
            return Err(ValidationError::NonFinite("domain.upper"));
        }
        if upper <= spec.domain.lower {
            return Err(ValidationError::InvalidUpperBound {
                upper,
                lower: spec.domain.lower,
            });
        }
    }

    if spec.domain.max_calibration_steps == 0 {
        return Err(ValidationError::ZeroCalibrationSteps);
    }

    if spec.stopping.improvement_threshold < 0.0 {
        return Err(ValidationError::InvalidImprovementThreshold(
            spec.stopping.improvement_threshold,
        ));
    }

    if spec.stopping.consecutive_trials == 0 {
        return Err(ValidationError::InvalidConsecutiveTrials(
            spec.stopping.consecutive_trials,
        ));
    }

    if spec.stopping.x_range <= 0.0 || spec.stopping.x_range > 1.0 {
        return Err(ValidationError::InvalidXRange(spec.stopping.x_range));
    }

    if spec.model.fixed_noise_variance <= 0.0 {
        return Err(ValidationError::InvalidNoiseVariance(
            spec.model.fixed_noise_variance,
        ));
    }

    let efforts = [
        ("acquisition.num_restarts", spec.acquisition.num_restarts),
        ("acquisition.raw_samples", spec.acquisition.raw_samples),
        ("acquisition.es_candidates", spec.acquisition.es_candidates),
        ("acquisition.kg_fantasies", spec.acquisition.kg_fantasies),
        ("acquisition.kg_restarts", spec.acquisition.kg_restarts),
        ("acquisition.kg_raw_samples", spec.acquisition.kg_raw_samples),
    ];
    for (field, value) in efforts {
        if value == 0 {
            return Err(ValidationError::ZeroEffort { field });
        }
    }

    if spec.output.grid_points < 2 {
        return Err(ValidationError::InvalidGridSize(spec.output.grid_points));
    }

    Ok(())
}
