//! Ensayo CLI
//!
//! # Usage
//!
//! ```bash
//! # Calibrate the domain and run the experiment loop
//! ensayo run study.yaml
//!
//! # Same run with a fixed seed and a lower iteration cap
//! ensayo run study.yaml --seed 7 --max-iterations 20
//!
//! # Only find the domain upper bound
//! ensayo calibrate study.yaml
//!
//! # Check a specification and print what it resolves to
//! ensayo validate study.yaml --detailed
//! ensayo identity study.yaml
//!
//! # Inspect a finished trial log
//! ensayo summary BayesOpt_outputs_matern_1.5_zero_variable_noise_EI_stopping_y.csv
//! ```

use clap::Parser;
use ensayo::cli::{run_command, Cli, LogLevel};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.verbose, cli.quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.tracing_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
