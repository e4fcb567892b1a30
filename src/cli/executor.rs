//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{CheckCommandHandler, ServeCommandHandler, TestCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{ConfigLoader, Settings};
use crate::error::AppResult;
use crate::logger::LogLevelHandle;

/// Execute a CLI command with the given settings
///
/// Without a subcommand the server is started.
///
/// # Errors
/// Returns errors from command handlers
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    loader: ConfigLoader,
    log_handle: Option<LogLevelHandle>,
) -> AppResult<()> {
    warn_about_serve_args(cli);

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings, loader)
                .execute(*dry_run, log_handle, cli.log_level_override())
                .await
        }
        None => {
            ServeCommandHandler::new(settings, loader)
                .execute(false, log_handle, cli.log_level_override())
                .await
        }
        Some(Commands::Test { target }) => {
            TestCommandHandler::new(&settings)?.execute(*target).await?;
            Ok(())
        }
        Some(Commands::Check) => {
            CheckCommandHandler::new(settings).execute().await?;
            Ok(())
        }
    }
}

/// Warns about host/port combinations that are legal but probably wrong
fn warn_about_serve_args(cli: &Cli) {
    let Some(Commands::Serve {
        host: Some(host),
        port,
        ..
    }) = &cli.command
    else {
        return;
    };

    if host == "0.0.0.0" {
        tracing::warn!("Listening on all interfaces; anyone who can reach this port can trigger notifications");
        if let Some(port) = port
            && *port < 1024
        {
            tracing::warn!(port, "Binding to a privileged port typically requires root privileges");
        }
    }
}
