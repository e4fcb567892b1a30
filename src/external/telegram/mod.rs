//! Telegram Bot API integration.

mod bot;
mod error;
pub mod multipart;
mod types;

#[cfg(test)]
pub(crate) mod fake_api;

pub use bot::TelegramBot;
pub use error::{FailureKind, TelegramError, TelegramResult};
pub use types::{
    ApiMethod, ApiResponse, BotCredentials, BotUser, MessageId, PARSE_MODE_HTML, SentMessage,
    redact_token,
};
