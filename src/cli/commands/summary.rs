//! Summary command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{OutputFormat, SummaryArgs};
use crate::io::{LoggedRun, TrialLog};
use crate::viz::sparkline;

const SPARKLINE_WIDTH: usize = 60;

/// Format a parsed trial log as text
pub fn format_summary(run: &LoggedRun) -> String {
    let Some(summary) = &run.summary else {
        return format!(
            "{} trials, no summary (the run did not complete)",
            run.trials.len()
        );
    };
    let mut lines = vec![
        format!("Elapsed: {:.1}s", summary.elapsed_seconds),
        format!("Trials: {}", summary.total_trials),
        format!("Best value: {}", summary.best_y),
        format!("Maximizer: {}", summary.maximizer),
    ];
    if let (Some(first), Some(last)) = (summary.grid.first(), summary.grid.last()) {
        lines.push(format!(
            "Posterior mean over [{first}, {last}]: {}",
            sparkline(&summary.mean, SPARKLINE_WIDTH)
        ));
    }
    lines.join("\n")
}

pub fn run_summary(args: SummaryArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Verbose,
        &format!("Reading trial log: {}", args.log.display()),
    );
    let run = TrialLog::read(&args.log).map_err(|e| format!("Log error: {e}"))?;

    match args.format {
        OutputFormat::Text => println!("{}", format_summary(&run)),
        OutputFormat::Json => {
            let json = run.to_json().map_err(|e| e.to_string())?;
            println!("{json}");
        }
    }
    Ok(())
}
