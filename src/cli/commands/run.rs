//! Run command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_overrides, load_spec, RunArgs, RunConfig};
use crate::optim::{InteractiveAugmenter, OptimizationLoop, RunReport};
use crate::oracle::build_oracles;
use crate::viz::{NullVisualizer, TerminalVisualizer, Visualizer};

const PLOT_WIDTH: usize = 72;

/// Format the outcome of a finished run
pub fn format_report(report: &RunReport) -> String {
    let mut lines = vec![
        format!(
            "Best value {} at x = {} ({} trials, {:.1}s)",
            report.best.y,
            report.best.x_physical,
            report.history.len(),
            report.elapsed_seconds
        ),
        format!("  Domain: [{}, {}]", report.bounds.lower, report.bounds.upper),
    ];
    if let Some(reason) = report.stop_reason {
        lines.push(format!("  Stopped: {reason}"));
    }
    lines.push(format!("  Trial log: {}", report.log_path.display()));
    lines.join("\n")
}

pub fn run_run(args: RunArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Loading run specification: {}", args.config.display()),
    );

    let mut spec = load_spec(&args.config).map_err(|e| format!("Config error: {e}"))?;
    apply_overrides(&mut spec, &args);
    let config = RunConfig::resolve(&spec);
    log(
        level,
        LogLevel::Normal,
        &format!("Run identity: {}", config.identity),
    );

    if args.dry_run {
        log(level, LogLevel::Normal, "Dry run: specification is valid");
        return Ok(());
    }

    let (mut oracle, mut calibration) = build_oracles(&config.oracle);
    let visualizer: Box<dyn Visualizer> = if config.visualize {
        Box::new(TerminalVisualizer::stderr(PLOT_WIDTH))
    } else {
        Box::new(NullVisualizer)
    };

    let mut session = OptimizationLoop::initialize(
        &config,
        oracle.as_mut(),
        calibration.as_mut(),
        visualizer,
    )
    .map_err(|e| format!("Initialization failed: {e}"))?;
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Domain [{}, {}], {} initial trials",
            session.bounds().lower,
            session.bounds().upper,
            session.history().len()
        ),
    );

    let reason = session
        .run_to_stop(oracle.as_mut())
        .map_err(|e| format!("Run failed: {e}"))?;
    log(
        level,
        LogLevel::Verbose,
        &format!("Stopped after {} iterations: {reason}", session.iterations()),
    );

    if config.interactive {
        let added = InteractiveAugmenter::stdio()
            .run(&mut session, oracle.as_mut())
            .map_err(|e| format!("Augmentation failed: {e}"))?;
        log(
            level,
            LogLevel::Verbose,
            &format!("Added {added} operator points"),
        );
    }

    let report = session
        .finish()
        .map_err(|e| format!("Failed to write summary: {e}"))?;
    log(level, LogLevel::Normal, &format_report(&report));
    Ok(())
}
