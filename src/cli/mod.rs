//! CLI module for herald-rs
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration merging (CLI args + config files)
//! - Command execution
//! - Command handlers for serve, test and check

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel, TestTarget};

use anyhow::Context;

use crate::config::{ConfigLoader, Settings};
use crate::logger::{LogLevelHandle, init_logger};

/// Load configuration and apply CLI overrides
///
/// Returns the merged settings together with the loader they came from,
/// so the server can reload the same sources later.
///
/// # Errors
/// Returns error if configuration loading, merging, or validation fails
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<(Settings, ConfigLoader)> {
    let loader = cli.config_loader().context("Configuration error")?;
    let merger = ConfigurationMerger::from_loader(&loader).with_context(|| {
        match loader.config_file() {
            Some(file) => format!("Failed to load configuration from {}", file.display()),
            None => format!(
                "Failed to load configuration from {} ({})",
                loader.config_dir().display(),
                loader.environment()
            ),
        }
    })?;
    let settings = merger
        .merge_cli_args(cli)
        .context("Configuration merge error")?;
    Ok((settings, loader))
}

/// Initialize logger from settings
///
/// # Errors
/// Returns error if the logger configuration is invalid or a global
/// subscriber is already installed
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<LogLevelHandle> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Logger configuration error")?;
    init_logger(logger_config).context("Logger initialization error")
}
