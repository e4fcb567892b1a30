//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{ConfigError, ConfigLoader};

/// Relay stream start/stop events to a Telegram chat
#[derive(Parser, Debug)]
#[command(name = "herald-rs")]
#[command(about = "Relay stream start/stop events to a Telegram chat")]
#[command(long_about = "
herald-rs listens for stream lifecycle events and posts matching messages
to a Telegram chat through the Bot API. The start message can carry a photo
and can be deleted again when the stream stops.

EXAMPLES:
    # Start the event listener with default configuration
    herald-rs serve

    # Listen on all interfaces on a custom port
    herald-rs serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    herald-rs --config /etc/herald/herald.toml serve

    # Check configuration without starting the listener
    herald-rs serve --dry-run

    # Send the start notification right now
    herald-rs test start

    # Ask the Bot API whether the token is valid
    herald-rs check

The bot token is best kept in config/local.toml or HERALD_TELEGRAM__BOT_TOKEN.
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered `config/` directory.
    /// Takes precedence over HERALD_CONFIG_DIR and HERALD_CONFIG_FILE.
    ///
    /// Example: --config /etc/herald/herald.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` layer is loaded.
    ///
    /// Available values: development (dev), production (prod), test
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Raises the log level to debug. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Lowers the log level to error. Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the event listener (default)
    ///
    /// Examples:
    ///   herald-rs serve                            # Start with defaults
    ///   herald-rs serve --host 0.0.0.0 --port 8080 # Listen on all interfaces
    ///   herald-rs serve --dry-run                  # Validate config without starting
    Serve {
        /// Host address to bind to
        ///
        /// Use 127.0.0.1 when the streaming app runs on the same machine.
        ///
        /// Default: 127.0.0.1
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        ///
        /// Default: 3000
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Overrides the configuration file and --verbose/--quiet. A level
        /// set here survives settings reloads.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Send a test notification now
    ///
    /// Examples:
    ///   herald-rs test start   # Start message (or photo), ignoring enable_start
    ///   herald-rs test end     # Stop side: delete if configured, then end message
    Test {
        #[arg(value_enum)]
        target: TestTarget,
    },
    /// Validate configuration and the bot token via getMe
    Check,
}

/// Which side of a stream cycle to simulate
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestTarget {
    #[value(name = "start")]
    Start,
    #[value(name = "end", alias = "stop")]
    End,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "test")]
    Test,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl Cli {
    /// Configuration loader honouring `--config` and `--env`.
    ///
    /// # Errors
    /// Fails when HERALD_CONFIG_DIR and HERALD_CONFIG_FILE are both set and
    /// no `--config` was given.
    pub fn config_loader(&self) -> Result<ConfigLoader, ConfigError> {
        let loader = match &self.config {
            Some(path) => ConfigLoader::from_file(path)
                .with_environment(crate::config::Environment::from_env()),
            None => ConfigLoader::new()?,
        };

        Ok(match self.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        })
    }

    /// Log level forced on the command line, if any.
    ///
    /// `serve --log-level` wins over `--verbose`/`--quiet`.
    pub fn log_level_override(&self) -> Option<String> {
        if let Some(Commands::Serve {
            log_level: Some(level),
            ..
        }) = &self.command
        {
            return Some((*level).into());
        }

        if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Production => crate::config::Environment::Production,
            Environment::Test => crate::config::Environment::Test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["herald-rs", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["herald-rs", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_behavior() {
        let cli = Cli::try_parse_from(["herald-rs"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
        assert!(cli.env.is_none());
        assert_eq!(cli.log_level_override(), None);
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from(["herald-rs", "serve", "--host", "0.0.0.0", "--port", "8080"])
            .unwrap();
        let Some(Commands::Serve {
            host,
            port,
            log_level,
            dry_run,
        }) = cli.command
        else {
            panic!("Expected Serve command");
        };
        assert_eq!(host, Some("0.0.0.0".to_string()));
        assert_eq!(port, Some(8080));
        assert_eq!(log_level, None);
        assert!(!dry_run);
    }

    #[test]
    fn test_test_command() {
        let cli = Cli::try_parse_from(["herald-rs", "test", "stop"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Test {
                target: TestTarget::End
            })
        ));
        assert!(Cli::try_parse_from(["herald-rs", "test"]).is_err());
        assert!(Cli::try_parse_from(["herald-rs", "test", "middle"]).is_err());
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::try_parse_from(["herald-rs", "-q", "check"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check)));
        assert_eq!(cli.log_level_override(), Some("error".to_string()));
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["herald-rs", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_command_log_level_beats_global_flag() {
        let cli =
            Cli::try_parse_from(["herald-rs", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(cli.log_level_override(), Some("warn".to_string()));
    }

    #[test]
    fn test_env_flag_selects_environment() {
        let _lock = crate::config::loader::tests::ENV_MUTEX.lock().unwrap();
        let mut env = crate::config::loader::tests::EnvGuard::new();
        env.isolate();

        let cli = Cli::try_parse_from(["herald-rs", "--env", "prod"]).unwrap();
        let loader = cli.config_loader().unwrap();
        assert_eq!(loader.environment(), crate::config::Environment::Production);
        assert!(loader.config_file().is_none());
    }

    #[test]
    fn test_config_flag_wins_over_env_vars() {
        let _lock = crate::config::loader::tests::ENV_MUTEX.lock().unwrap();
        let mut env = crate::config::loader::tests::EnvGuard::new();
        env.isolate();
        env.set("HERALD_CONFIG_DIR", "/nowhere");
        env.set("HERALD_CONFIG_FILE", "/nowhere/herald.toml");

        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["herald-rs", "--config", path]).unwrap();

        let loader = cli.config_loader().unwrap();
        assert_eq!(loader.config_file(), Some(file.path()));
    }
}
