//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{
    load_config, AcquisitionKind, KernelKind, NoiseKind, OracleSpec, RunConfig, ValidateArgs,
};

/// Format surrogate configuration as a string
pub fn format_model_info(config: &RunConfig) -> String {
    let kernel = match config.surrogate.kernel {
        KernelKind::Matern { nu } => format!("Matérn (nu = {nu})"),
        KernelKind::Rbf => "RBF".to_string(),
    };
    let noise = match config.surrogate.noise {
        NoiseKind::Fixed { variance } => format!("fixed ({variance})"),
        NoiseKind::Learned => "learned".to_string(),
    };
    format!(
        "  Kernel: {kernel}\n  Mean: {:?}\n  Noise: {noise}",
        config.surrogate.mean
    )
}

/// Format acquisition configuration as a string
pub fn format_acquisition_info(config: &RunConfig) -> String {
    let acq = &config.acquisition;
    let mut lines = vec![
        format!("  Acquisition: {}", acq.kind.tag()),
        format!(
            "  Restarts / raw samples: {} / {}",
            acq.optimizer.num_restarts, acq.optimizer.raw_samples
        ),
    ];
    match acq.kind {
        AcquisitionKind::KnowledgeGradient => lines.push(format!(
            "  Fantasies: {} ({} restarts, {} raw samples)",
            acq.knowledge_gradient.fantasies,
            acq.knowledge_gradient.optimizer.num_restarts,
            acq.knowledge_gradient.optimizer.raw_samples
        )),
        AcquisitionKind::MaxValueEntropy => lines.push(format!("  Candidate set: {}", acq.es_candidates)),
        _ => {}
    }
    lines.join("\n")
}

/// Format stopping configuration as a string
pub fn format_stopping_info(config: &RunConfig) -> String {
    let stop = &config.stopping;
    format!(
        "  Stopping: {}\n  Threshold: {}\n  K: {}\n  x range: {}\n  Iteration cap: {}",
        stop.kind.tag(),
        stop.improvement_threshold,
        stop.consecutive_trials,
        stop.x_range,
        stop.max_iterations
    )
}

/// Format domain and design configuration as a string
pub fn format_domain_info(config: &RunConfig) -> String {
    let cal = &config.calibration;
    let upper = match cal.fixed_upper {
        Some(upper) => format!("{upper} (fixed)"),
        None => format!(
            "calibrated to metric in [{}, {}] from {}",
            cal.ratio_min, cal.ratio_max, cal.initial_guess
        ),
    };
    format!(
        "  Lower: {}\n  Upper: {upper}\n  Initial design: {} x {:?}",
        cal.lower, config.design.initial_points, config.design.strategy
    )
}

/// Format oracle configuration as a string
pub fn format_oracle_info(config: &RunConfig) -> String {
    match &config.oracle {
        OracleSpec::Quadratic { a, b, .. } => format!("  Oracle: quadratic ({a} x^2 + {b} x)"),
        OracleSpec::Process(process) => format!(
            "  Oracle: {} {}\n  Working dir: {}",
            process.program,
            process.args.join(" "),
            process.working_dir.display()
        ),
    }
}

/// Print detailed configuration summary
pub fn print_detailed_summary(config: &RunConfig) {
    println!();
    println!("Configuration Summary ({}):", config.identity);
    println!("{}", format_model_info(config));
    println!();
    println!("{}", format_acquisition_info(config));
    println!();
    println!("{}", format_stopping_info(config));
    println!();
    println!("{}", format_domain_info(config));
    println!();
    println!("{}", format_oracle_info(config));
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating run specification: {}", args.config.display()),
    );

    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "Run specification is valid");

    if args.detailed {
        print_detailed_summary(&config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProcessSpec, RunSpec};
    use std::path::PathBuf;

    fn make_test_config(yaml: &str) -> RunConfig {
        let spec: RunSpec = serde_yaml::from_str(yaml).unwrap();
        RunConfig::resolve(&spec)
    }

    #[test]
    fn test_format_model_info() {
        let info = format_model_info(&make_test_config("model:\n  kernel: rbf\n  noise: fixed\n"));
        assert!(info.contains("RBF"));
        assert!(info.contains("fixed (0.000001)"));
    }

    #[test]
    fn test_format_acquisition_info_kg() {
        let info = format_acquisition_info(&make_test_config("acquisition:\n  policy: kg\n"));
        assert!(info.contains("KG"));
        assert!(info.contains("Fantasies: 128"));
    }

    #[test]
    fn test_format_acquisition_info_es() {
        let info = format_acquisition_info(&make_test_config("acquisition:\n  policy: es\n"));
        assert!(info.contains("Candidate set: 1000"));
    }

    #[test]
    fn test_format_stopping_info() {
        let info = format_stopping_info(&make_test_config("stopping:\n  policy: spatial\n"));
        assert!(info.contains("stopping_xy"));
        assert!(info.contains("0.05"));
    }

    #[test]
    fn test_format_domain_info() {
        let info = format_domain_info(&make_test_config("{}"));
        assert!(info.contains("[1.5, 1.6]"));
        let fixed = format_domain_info(&make_test_config("domain:\n  upper: 30\n"));
        assert!(fixed.contains("30 (fixed)"));
    }

    #[test]
    fn test_format_oracle_info_process() {
        let mut config = make_test_config("{}");
        config.oracle = OracleSpec::Process(ProcessSpec {
            program: "./sim".to_string(),
            args: vec!["{x}".to_string()],
            calibration_program: None,
            calibration_args: vec![],
            working_dir: PathBuf::from("build_release"),
            contraction_prefix: "c".to_string(),
            prestretch_prefix: "p".to_string(),
        });
        let info = format_oracle_info(&config);
        assert!(info.contains("./sim {x}"));
        assert!(info.contains("build_release"));
    }
}
