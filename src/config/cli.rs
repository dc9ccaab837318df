//! Command-line interface definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::schema::RunSpec;

/// Ensayo: closed-loop Bayesian experimental design
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "ensayo")]
#[command(author = "PAIML")]
#[command(version)]
#[command(
    about = "Calibrates an input domain, then runs a Gaussian-process driven experiment loop against a black-box oracle"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Calibrate the domain and run the optimization loop
    Run(RunArgs),

    /// Run only the domain calibration and print the upper bound
    Calibrate(ConfigArgs),

    /// Validate a run specification without running it
    Validate(ValidateArgs),

    /// Print the run identity a specification resolves to
    Identity(ConfigArgs),

    /// Summarize a finished trial log
    Summary(SummaryArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// Path to YAML run specification
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the iteration cap
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Offer interactive augmentation after the loop stops
    #[arg(long)]
    pub interactive: bool,

    /// Disable surrogate rendering
    #[arg(long)]
    pub no_visualize: bool,

    /// Validate and resolve the specification, then exit
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for commands that only need a specification
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ConfigArgs {
    /// Path to YAML run specification
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML run specification
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show the resolved configuration
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the summary command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct SummaryArgs {
    /// Trial log written by a finished run
    #[arg(value_name = "LOG")]
    pub log: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a specification
pub fn apply_overrides(spec: &mut RunSpec, args: &RunArgs) {
    if let Some(dir) = &args.output_dir {
        spec.output.dir = dir.clone();
    }
    if let Some(seed) = args.seed {
        spec.design.seed = Some(seed);
    }
    if let Some(max_iterations) = args.max_iterations {
        spec.stopping.max_iterations = max_iterations;
    }
    if args.interactive {
        spec.interactive = true;
    }
    if args.no_visualize {
        spec.visualize = false;
    }
}
