//! Application state for Axum web framework.
//!
//! Contains the notification service and what is needed to reload it
//! from disk.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::error::{AppError, AppResult};
use crate::logger::LogLevelHandle;
use crate::services::{NotificationService, NotifierStatus};

/// Application state shared by all request handlers.
///
/// Cloning is cheap: the service sits behind an `Arc` and the log handle
/// is itself reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Event adapter and Bot API client
    pub notifications: Arc<NotificationService>,
    /// Loader used by the reload endpoint
    pub loader: ConfigLoader,
    /// Handle for changing the log level after a reload
    pub log_handle: Option<LogLevelHandle>,
    /// Level forced on the command line; wins over reloaded settings
    pub log_level_override: Option<String>,
}

impl AppState {
    pub fn new(notifications: NotificationService, loader: ConfigLoader) -> Self {
        Self {
            notifications: Arc::new(notifications),
            loader,
            log_handle: None,
            log_level_override: None,
        }
    }

    /// Attaches the log level handle and an optional command line override.
    pub fn with_log_handle(mut self, handle: LogLevelHandle, level_override: Option<String>) -> Self {
        self.log_handle = Some(handle);
        self.log_level_override = level_override;
        self
    }

    /// Runs a notification task on its own tokio task and waits for it.
    ///
    /// Dropping the returned future (request timeout, client hang-up) does
    /// not cancel the task, so a Bot API call that was issued always gets to
    /// update the sent-message record.
    pub async fn detached<F, Fut, T>(&self, task: F) -> AppResult<T>
    where
        F: FnOnce(Arc<NotificationService>) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        tokio::spawn(task(Arc::clone(&self.notifications)))
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::new(e).context("notification task did not finish"),
            })
    }

    /// Re-reads configuration from disk and applies it.
    ///
    /// The sent-message record is cleared. The log level follows the new
    /// settings unless it was forced on the command line.
    pub async fn reload(&self) -> AppResult<NotifierStatus> {
        let settings = self.loader.load()?;
        self.notifications
            .reload_settings(settings.notifier())
            .await?;

        if let (Some(handle), None) = (&self.log_handle, &self.log_level_override) {
            handle
                .set_level(&settings.logger.level)
                .map_err(anyhow::Error::new)?;
        }

        tracing::info!(
            environment = %self.loader.environment(),
            level = %settings.logger.level,
            "Configuration reloaded"
        );
        Ok(self.notifications.status().await)
    }
}
