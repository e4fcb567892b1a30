//! Check command handler
//!
//! Validates configuration and asks the Bot API who the token belongs to.
//! Nothing is posted to the chat.

use crate::config::Settings;
use crate::error::AppResult;
use crate::external::telegram::{BotUser, TelegramError, redact_token};
use crate::services::NotificationService;

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// # Errors
    /// - Configuration validation errors
    /// - Missing token, unreachable Bot API or a rejected token
    pub async fn execute(&self) -> AppResult<BotUser> {
        self.config.validate()?;
        println!("✓ Configuration is valid");

        let telegram = &self.config.telegram;
        if telegram.bot_token.trim().is_empty() {
            return Err(TelegramError::MissingCredentials.into());
        }
        if telegram.chat_id.trim().is_empty() {
            println!("! Chat id is missing; notifications will not be sent");
        }

        let service = NotificationService::from_settings(self.config.notifier())?;
        let bot = service.check_bot().await?;

        println!(
            "✓ Token {} belongs to {} (@{})",
            redact_token(telegram.bot_token.trim()),
            bot.first_name,
            bot.username.as_deref().unwrap_or("-")
        );
        Ok(bot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::external::telegram::FailureKind;
    use crate::external::telegram::fake_api::{FakeBotApi, TOKEN};

    #[tokio::test]
    async fn test_check_valid_token() {
        let api = FakeBotApi::start().await;
        let mut config = Settings::default();
        config.telegram = api.telegram_config(TOKEN, "");

        let bot = CheckCommandHandler::new(config).execute().await.unwrap();
        assert_eq!(bot.username.as_deref(), Some("herald_test_bot"));
        assert_eq!(api.calls()[0].method, "getMe");
    }

    #[tokio::test]
    async fn test_check_rejected_token() {
        let api = FakeBotApi::start().await;
        let mut config = Settings::default();
        config.telegram = api.telegram_config("1:nope", "42");

        let err = CheckCommandHandler::new(config).execute().await.unwrap_err();
        match err {
            AppError::Notification { source } => assert_eq!(source.kind(), FailureKind::Rejected),
            other => panic!("Expected Notification, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_check_without_token() {
        let err = CheckCommandHandler::new(Settings::default())
            .execute()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Notification { .. }));
    }
}
