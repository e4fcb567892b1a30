//! Error types for Bot API calls.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use super::types::{ApiMethod, MessageId};

/// Every way a Bot API call can fail.
///
/// Nothing here is ever escalated past the event adapter; callers decide
/// whether a failure deserves attention through [`TelegramError::kind`].
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot token or chat target is empty; no request was made
    #[error("bot token or chat id is not configured")]
    MissingCredentials,

    /// Message id is zero or negative; no request was made
    #[error("invalid message id: {0}")]
    InvalidMessageId(MessageId),

    /// No start notification is recorded; no request was made
    #[error("no start message is recorded")]
    NothingToDelete,

    /// Photo path does not exist; nothing was read or sent
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Photo exists but could not be read
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request did not complete within the configured timeout
    #[error("{method} timed out")]
    Timeout { method: ApiMethod },

    /// Connection, TLS or body transfer failure
    #[error("{method} request failed")]
    Transport {
        method: ApiMethod,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the expected Bot API envelope
    #[error("{method} returned an unexpected response: {reason}")]
    Protocol { method: ApiMethod, reason: String },

    /// The Bot API answered with `ok: false`
    #[error("{method} was rejected by the Bot API: {description}")]
    Api {
        method: ApiMethod,
        error_code: Option<i64>,
        description: String,
    },
}

/// Coarse classification of a [`TelegramError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotConfigured,
    NothingToDo,
    NotFound,
    /// The photo exists but could not be read
    LocalIo,
    Timeout,
    Transport,
    Protocol,
    Rejected,
}

impl TelegramError {
    /// Maps a reqwest failure, dropping the URL since it embeds the bot token.
    pub(crate) fn from_reqwest(method: ApiMethod, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TelegramError::Timeout { method }
        } else {
            TelegramError::Transport {
                method,
                source: error.without_url(),
            }
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            TelegramError::MissingCredentials => FailureKind::NotConfigured,
            TelegramError::InvalidMessageId(_) | TelegramError::NothingToDelete => {
                FailureKind::NothingToDo
            }
            TelegramError::FileNotFound { .. } => FailureKind::NotFound,
            TelegramError::Io { .. } => FailureKind::LocalIo,
            TelegramError::Timeout { .. } => FailureKind::Timeout,
            TelegramError::Transport { .. } => FailureKind::Transport,
            TelegramError::Protocol { .. } => FailureKind::Protocol,
            TelegramError::Api { .. } => FailureKind::Rejected,
        }
    }

    /// Whether an operator should look at this failure.
    ///
    /// `NothingToDelete` and friends are expected in normal operation.
    pub fn needs_attention(&self) -> bool {
        !matches!(self.kind(), FailureKind::NothingToDo)
    }
}

/// Type alias for Result with TelegramError
pub type TelegramResult<T> = Result<T, TelegramError>;
