//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::{ConfigLoader, Settings};
use crate::error::{AppError, AppResult};
use crate::logger::LogLevelHandle;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
    loader: ConfigLoader,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    ///
    /// `loader` is the one `config` was loaded with; the server reuses it
    /// for reloads.
    pub fn new(config: Settings, loader: ConfigLoader) -> Self {
        Self { config, loader }
    }

    /// Run the server, or only validate when `dry_run` is set
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Server startup errors (if not dry-run)
    pub async fn execute(
        self,
        dry_run: bool,
        log_handle: Option<LogLevelHandle>,
        log_level_override: Option<String>,
    ) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        let mut server = Server::new(self.config, self.loader);
        if let Some(handle) = log_handle {
            server = server.with_log_handle(handle, log_level_override);
        }
        server.run().await.map_err(|source| AppError::Internal { source })
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        let telegram = &self.config.telegram;
        let notifications = &self.config.notifications;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        if telegram.has_credentials() {
            println!("✓ Bot token and chat id are configured");
        } else {
            println!("! Bot token or chat id is missing; notifications will not be sent");
        }
        if let Some(path) = notifications.photo.active_path() {
            if path.exists() {
                println!("✓ Start photo found: {}", path.display());
            } else {
                println!("! Start photo not found: {}", path.display());
            }
        }
        println!("✓ Logger configuration is valid");

        println!("Dry run completed successfully");
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(config: Settings) -> ServeCommandHandler {
        ServeCommandHandler::new(config, ConfigLoader::from_file("config/default.toml"))
    }

    #[test]
    fn test_serve_handler_new() {
        let config = Settings::default();
        assert_eq!(handler(config.clone()).config(), &config);
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run() {
        let result = handler(Settings::default()).execute(true, None, None).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run_invalid_config() {
        let mut config = Settings::default();
        config.server.port = 0;

        let result = handler(config).execute(true, None, None).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
