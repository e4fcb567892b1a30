use thiserror::Error;

use crate::config::ConfigError;
use crate::external::telegram::TelegramError;

/// Application-wide error type for everything above the Bot API client.
///
/// Notification failures during event handling are reported, not raised;
/// this type covers requests that cannot be served at all.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// A manual Bot API call failed
    #[error("Notification failed: {source}")]
    Notification {
        #[source]
        source: TelegramError,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<TelegramError> for AppError {
    fn from(error: TelegramError) -> Self {
        AppError::Notification { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::ValidationError { field, message } => AppError::Validation {
                field,
                reason: message,
            },
            other => AppError::Configuration {
                key: "config".to_string(),
                source: anyhow::Error::new(other),
            },
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
