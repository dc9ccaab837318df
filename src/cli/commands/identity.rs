//! Identity command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, ConfigArgs};

pub fn run_identity(args: ConfigArgs, level: LogLevel) -> Result<(), String> {
    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    log(
        level,
        LogLevel::Verbose,
        &format!("Resolved from {}", args.config.display()),
    );
    println!("{}", config.identity);
    Ok(())
}
