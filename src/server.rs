//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{ConfigLoader, Settings};
use crate::logger::LogLevelHandle;
use crate::services::NotificationService;
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
    loader: ConfigLoader,
    log_handle: Option<LogLevelHandle>,
    log_level_override: Option<String>,
}

impl Server {
    /// Create a new server with the given settings
    ///
    /// `loader` is kept for the reload endpoint and should be the one the
    /// settings came from.
    pub fn new(settings: Settings, loader: ConfigLoader) -> Self {
        Self {
            settings,
            loader,
            log_handle: None,
            log_level_override: None,
        }
    }

    /// Let reloads change the log level unless it was forced on the command line.
    pub fn with_log_handle(mut self, handle: LogLevelHandle, level_override: Option<String>) -> Self {
        self.log_handle = Some(handle);
        self.log_level_override = level_override;
        self
    }

    /// Start the server and run until shutdown signal
    ///
    /// # Errors
    /// - HTTP client construction errors
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %self.loader.environment(),
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = self.settings.server.port,
            request_timeout = self.settings.server.request_timeout,
            "Server configuration loaded"
        );

        let notifications = &self.settings.notifications;
        tracing::info!(
            credentials_configured = self.settings.telegram.has_credentials(),
            enable_start = notifications.enable_start,
            enable_end = notifications.enable_end,
            delete_start_message = notifications.delete_start_message,
            photo = notifications.photo.enabled,
            "Notification configuration loaded"
        );
        if !self.settings.telegram.has_credentials() {
            tracing::warn!(
                "Bot token or chat id is not configured; events will be reported as not configured"
            );
        }

        let service = NotificationService::from_settings(self.settings.notifier())
            .map_err(|e| anyhow::anyhow!("Failed to create Bot API client: {e}"))?;

        let mut state = AppState::new(service, self.loader);
        if let Some(handle) = self.log_handle {
            state = state.with_log_handle(handle, self.log_level_override);
        }

        let router = create_router(
            state,
            Duration::from_secs(self.settings.server.request_timeout),
        );

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {address}: {e}")
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed never fires; the other one still does.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
