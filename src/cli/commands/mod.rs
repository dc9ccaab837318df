//! CLI command implementations

mod calibrate;
mod identity;
mod run;
mod summary;
mod validate;

#[cfg(test)]
mod tests;

use crate::cli::LogLevel;
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);

    match cli.command {
        Command::Run(args) => run::run_run(args, log_level),
        Command::Calibrate(args) => calibrate::run_calibrate(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
        Command::Identity(args) => identity::run_identity(args, log_level),
        Command::Summary(args) => summary::run_summary(args, log_level),
    }
}
