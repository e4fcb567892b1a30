//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments override file and environment values.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

/// Applies CLI overrides on top of loaded settings
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration through `loader`
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_loader(loader: &ConfigLoader) -> Result<Self, ConfigError> {
        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// Precedence, highest first:
    /// 1. `serve --host/--port/--log-level`
    /// 2. `--verbose`/`--quiet`
    /// 3. Configuration files and environment variables
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if let Some(level) = cli.log_level_override() {
            config.logger.level = level;
        }

        if let Some(Commands::Serve { host, port, .. }) = &cli.command {
            if let Some(host_addr) = host {
                config.server.host = host_addr.clone();
            }
            if let Some(port_num) = port {
                config.server.port = *port_num;
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Get the base configuration
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn merge(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(Settings::default())
            .merge_cli_args(&cli)
            .unwrap()
    }

    #[test]
    fn test_configuration_merger_new() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_no_flags_keep_file_values() {
        assert_eq!(merge(&["herald-rs"]), Settings::default());
    }

    #[test]
    fn test_verbose_and_quiet_flags() {
        assert_eq!(merge(&["herald-rs", "--verbose"]).logger.level, "debug");
        assert_eq!(merge(&["herald-rs", "--quiet"]).logger.level, "error");
    }

    #[test]
    fn test_serve_overrides() {
        let merged = merge(&["herald-rs", "serve", "--host", "0.0.0.0", "--port", "8080"]);
        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 8080);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged = merge(&["herald-rs", "--verbose", "serve", "--log-level", "warn"]);
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_invalid_base_config_is_rejected() {
        let mut base = Settings::default();
        base.telegram.timeout_seconds = 0;
        let cli = Cli::try_parse_from(["herald-rs"]).unwrap();

        let err = ConfigurationMerger::new(base).merge_cli_args(&cli).unwrap_err();
        assert_eq!(err.field(), Some("telegram.timeout_seconds"));
    }
}
