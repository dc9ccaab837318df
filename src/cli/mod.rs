//! CLI module for ensayo
//!
//! Command handlers return `Result<(), String>`; the binary maps an error to
//! a non-zero exit code.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::{log, LogLevel};

pub use crate::config::Cli;
