//! Test command handler
//!
//! Sends a start or end notification right away, outside of any real
//! stream, and prints what happened.

use crate::cli::parser::TestTarget;
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::services::NotificationService;
use crate::services::notifications::{EventReport, StepOutcome};

/// Handler for the test command
pub struct TestCommandHandler {
    service: NotificationService,
}

impl TestCommandHandler {
    pub fn new(config: &Settings) -> AppResult<Self> {
        let service = NotificationService::from_settings(config.notifier())?;
        Ok(Self { service })
    }

    /// Run one manual trigger and print the report
    ///
    /// # Errors
    /// - Missing credentials
    /// - Any step that failed
    pub async fn execute(&self, target: TestTarget) -> AppResult<EventReport> {
        let report = match target {
            TestTarget::Start => self.service.test_start().await?,
            TestTarget::End => self.service.test_end().await?,
        };

        for line in describe(&report) {
            println!("{line}");
        }

        if report.has_failures() {
            return Err(AppError::Internal {
                source: anyhow::anyhow!("test {} notification failed", report.event),
            });
        }
        Ok(report)
    }
}

/// One line per step, e.g. `✓ start: sent (message 101)`.
fn describe(report: &EventReport) -> Vec<String> {
    report
        .steps
        .iter()
        .map(|step| {
            let name = step.step;
            match &step.outcome {
                StepOutcome::Sent { message_id } => format!("✓ {name}: sent (message {message_id})"),
                StepOutcome::Deleted { message_id } => {
                    format!("✓ {name}: deleted message {message_id}")
                }
                StepOutcome::Skipped { reason } => format!("- {name}: skipped ({reason:?})"),
                StepOutcome::Failed { error, .. } => format!("✗ {name}: {error}"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::telegram::fake_api::{FakeBotApi, TOKEN};

    fn config(api: &FakeBotApi) -> Settings {
        let mut config = Settings::default();
        config.telegram = api.telegram_config(TOKEN, "42");
        config
    }

    #[tokio::test]
    async fn test_start_sends_message() {
        let api = FakeBotApi::start().await;
        let handler = TestCommandHandler::new(&config(&api)).unwrap();

        let report = handler.execute(TestTarget::Start).await.unwrap();
        assert_eq!(describe(&report), vec!["✓ start: sent (message 100)".to_string()]);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_end_without_delete() {
        let api = FakeBotApi::start().await;
        let handler = TestCommandHandler::new(&config(&api)).unwrap();

        let report = handler.execute(TestTarget::End).await.unwrap();
        assert_eq!(
            describe(&report),
            vec![
                "- delete: skipped (Disabled)".to_string(),
                "✓ end: sent (message 100)".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_fail() {
        let api = FakeBotApi::start().await;
        let mut config = config(&api);
        config.telegram.chat_id = String::new();
        let handler = TestCommandHandler::new(&config).unwrap();

        let result = handler.execute(TestTarget::Start).await;
        assert!(matches!(result, Err(AppError::Notification { .. })));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_step_is_an_error() {
        let api = FakeBotApi::start().await;
        let mut config = config(&api);
        config.telegram.bot_token = "999:WRONG".to_string();
        let handler = TestCommandHandler::new(&config).unwrap();

        let result = handler.execute(TestTarget::Start).await;
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }
}
