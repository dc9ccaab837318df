//! Calibrate command implementation

use crate::calibrate::{BoundsCalibrator, CalibrationStep};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, ConfigArgs};
use crate::oracle::build_oracles;

/// Format one calibration probe
pub fn format_step(step: &CalibrationStep) -> String {
    format!("  step {:>3}: x = {:<12} metric = {}", step.step, step.guess, step.metric)
}

pub fn run_calibrate(args: ConfigArgs, level: LogLevel) -> Result<(), String> {
    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    if let Some(upper) = config.calibration.fixed_upper {
        log(
            level,
            LogLevel::Normal,
            "Upper bound is fixed by the specification, nothing to calibrate",
        );
        println!("{upper}");
        return Ok(());
    }

    let (_, mut calibration) = build_oracles(&config.oracle);
    let steps = BoundsCalibrator::new(config.calibration)
        .search(calibration.as_mut())
        .map_err(|e| format!("Calibration failed: {e}"))?;

    for step in &steps {
        log(level, LogLevel::Verbose, &format_step(step));
    }
    if let Some(last) = steps.last() {
        log(
            level,
            LogLevel::Normal,
            &format!("Upper bound found after {} steps", steps.len()),
        );
        println!("{}", last.guess);
    }
    Ok(())
}
