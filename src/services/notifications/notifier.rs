//! Chat client abstraction used by the notification service.

use std::path::Path;

use async_trait::async_trait;

use crate::config::TelegramConfig;
use crate::external::telegram::{BotUser, MessageId, SentMessage, TelegramBot, TelegramResult};

/// A chat client that can post and retract stream notifications.
///
/// Implementations own the sent-message record: a successful start message
/// or photo replaces it, a successful delete clears it.
///
/// # Example Implementation
/// ```ignore
/// #[async_trait]
/// impl ChatNotifier for MyClient {
///     fn name(&self) -> &'static str {
///         "my-client"
///     }
///     async fn send_start_message(&mut self, text: &str) -> TelegramResult<SentMessage> {
///         // ...
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Client name for logs
    fn name(&self) -> &'static str;

    /// Whether both token and chat target are set
    fn has_credentials(&self) -> bool;

    /// Apply new connection settings without touching the record
    fn update_config(&mut self, config: &TelegramConfig);

    fn last_start_message(&self) -> Option<MessageId>;

    fn clear_last_start_message(&mut self);

    /// Send the start notification as text and record it
    async fn send_start_message(&mut self, text: &str) -> TelegramResult<SentMessage>;

    /// Send the start notification as a photo and record it
    async fn send_start_photo(&mut self, path: &Path, caption: &str)
    -> TelegramResult<SentMessage>;

    /// Send the end notification; the record is left alone
    async fn send_end_message(&self, text: &str) -> TelegramResult<SentMessage>;

    /// Delete the recorded start notification
    async fn delete_last_start_message(&mut self) -> TelegramResult<()>;

    /// Check the bot token
    async fn get_me(&self) -> TelegramResult<BotUser>;
}

#[async_trait]
impl ChatNotifier for TelegramBot {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn has_credentials(&self) -> bool {
        TelegramBot::has_credentials(self)
    }

    fn update_config(&mut self, config: &TelegramConfig) {
        TelegramBot::update_config(self, config);
    }

    fn last_start_message(&self) -> Option<MessageId> {
        TelegramBot::last_start_message(self)
    }

    fn clear_last_start_message(&mut self) {
        TelegramBot::clear_last_start_message(self);
    }

    async fn send_start_message(&mut self, text: &str) -> TelegramResult<SentMessage> {
        self.send_message(text).await
    }

    async fn send_start_photo(
        &mut self,
        path: &Path,
        caption: &str,
    ) -> TelegramResult<SentMessage> {
        self.send_photo(path, caption).await
    }

    async fn send_end_message(&self, text: &str) -> TelegramResult<SentMessage> {
        self.send_untracked_message(text).await
    }

    async fn delete_last_start_message(&mut self) -> TelegramResult<()> {
        TelegramBot::delete_last_start_message(self).await
    }

    async fn get_me(&self) -> TelegramResult<BotUser> {
        TelegramBot::get_me(self).await
    }
}
