//! Event adapter: turns stream lifecycle events into chat notifications.
//!
//! The service owns the chat client and the current notifier settings.
//! Events are handled one at a time; every Bot API failure is logged and
//! reported in the returned [`EventReport`], never raised.

use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::events::{EventReport, SkipReason, Step, StepOutcome, StreamEvent};
use super::notifier::ChatNotifier;
use crate::config::{ConfigError, NotificationConfig, NotifierSettings};
use crate::external::telegram::{
    BotUser, MessageId, TelegramBot, TelegramError, TelegramResult, redact_token,
};

/// Start text used by manual tests when none is configured
pub const DEFAULT_TEST_START_TEXT: &str = "Test: stream started";

/// End text used by manual tests when none is configured
pub const DEFAULT_TEST_END_TEXT: &str = "Test: stream ended";

/// Snapshot of the notifier for status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct NotifierStatus {
    pub client: &'static str,
    pub credentials_configured: bool,
    pub bot_token: String,
    pub chat_id: String,
    pub last_start_message: Option<MessageId>,
    pub notifications: NotificationConfig,
}

pub struct NotificationService {
    settings: RwLock<NotifierSettings>,
    notifier: Mutex<Box<dyn ChatNotifier>>,
}

impl NotificationService {
    /// Creates a service around any chat client.
    pub fn new(settings: NotifierSettings, mut notifier: Box<dyn ChatNotifier>) -> Self {
        notifier.update_config(&settings.telegram);
        Self {
            settings: RwLock::new(settings),
            notifier: Mutex::new(notifier),
        }
    }

    /// Creates a service backed by the Telegram Bot API.
    pub fn from_settings(settings: NotifierSettings) -> TelegramResult<Self> {
        let bot = TelegramBot::new(&settings.telegram)?;
        Ok(Self::new(settings, Box::new(bot)))
    }

    /// Current notifier settings.
    pub fn snapshot(&self) -> NotifierSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Handles one lifecycle event.
    pub async fn handle_event(&self, event: StreamEvent) -> EventReport {
        let mut notifier = self.notifier.lock().await;
        let settings = self.snapshot();
        let notifications = &settings.notifications;

        let mut report = EventReport::new(event);
        match event {
            StreamEvent::Started => {
                let outcome = if !notifications.enable_start {
                    StepOutcome::Skipped {
                        reason: SkipReason::Disabled,
                    }
                } else {
                    self.start_step(&mut **notifier, notifications, &notifications.start_message)
                        .await
                };
                log_step(event, Step::Start, &outcome);
                report.push(Step::Start, outcome);
            }
            StreamEvent::Stopped => {
                self.stop_steps(&mut **notifier, notifications, event, None, &mut report)
                    .await;
            }
        }

        report
    }

    /// Sends the start notification regardless of `enable_start`.
    ///
    /// Fails fast when credentials are missing.
    pub async fn test_start(&self) -> TelegramResult<EventReport> {
        let mut notifier = self.notifier.lock().await;
        if !notifier.has_credentials() {
            return Err(TelegramError::MissingCredentials);
        }
        let settings = self.snapshot();
        let notifications = &settings.notifications;

        let text = if notifications.start_message.trim().is_empty() {
            DEFAULT_TEST_START_TEXT
        } else {
            notifications.start_message.as_str()
        };

        let event = StreamEvent::Started;
        let mut report = EventReport::new(event);
        let outcome = self.start_step(&mut **notifier, notifications, text).await;
        log_step(event, Step::Start, &outcome);
        report.push(Step::Start, outcome);
        Ok(report)
    }

    /// Runs the stop side as if the stream ended.
    ///
    /// Fails fast when credentials are missing.
    pub async fn test_end(&self) -> TelegramResult<EventReport> {
        let mut notifier = self.notifier.lock().await;
        if !notifier.has_credentials() {
            return Err(TelegramError::MissingCredentials);
        }
        let settings = self.snapshot();

        let event = StreamEvent::Stopped;
        let mut report = EventReport::new(event);
        self.stop_steps(
            &mut **notifier,
            &settings.notifications,
            event,
            Some(DEFAULT_TEST_END_TEXT),
            &mut report,
        )
        .await;
        Ok(report)
    }

    /// Applies a live settings change; the sent-message record is kept.
    pub async fn update_settings(&self, settings: NotifierSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        let mut notifier = self.notifier.lock().await;
        notifier.update_config(&settings.telegram);
        self.replace_settings(settings);
        info!(
            record = ?notifier.last_start_message(),
            "Notifier settings updated"
        );
        Ok(())
    }

    /// Applies freshly loaded settings and forgets the sent-message record.
    pub async fn reload_settings(&self, settings: NotifierSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        let mut notifier = self.notifier.lock().await;
        notifier.update_config(&settings.telegram);
        notifier.clear_last_start_message();
        self.replace_settings(settings);
        info!("Notifier settings reloaded");
        Ok(())
    }

    pub async fn status(&self) -> NotifierStatus {
        let notifier = self.notifier.lock().await;
        let settings = self.snapshot();
        NotifierStatus {
            client: notifier.name(),
            credentials_configured: notifier.has_credentials(),
            bot_token: redact_token(settings.telegram.bot_token.trim()),
            chat_id: settings.telegram.chat_id.trim().to_string(),
            last_start_message: notifier.last_start_message(),
            notifications: settings.notifications,
        }
    }

    pub async fn last_start_message(&self) -> Option<MessageId> {
        self.notifier.lock().await.last_start_message()
    }

    pub async fn has_credentials(&self) -> bool {
        self.notifier.lock().await.has_credentials()
    }

    /// Asks the Bot API who the configured token belongs to.
    pub async fn check_bot(&self) -> TelegramResult<BotUser> {
        let notifier = self.notifier.lock().await;
        notifier.get_me().await
    }

    fn replace_settings(&self, settings: NotifierSettings) {
        *self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner) = settings;
    }

    async fn start_step(
        &self,
        notifier: &mut dyn ChatNotifier,
        notifications: &NotificationConfig,
        text: &str,
    ) -> StepOutcome {
        if text.trim().is_empty() {
            return StepOutcome::Skipped {
                reason: SkipReason::EmptyText,
            };
        }

        let result = match notifications.photo.active_path() {
            Some(path) => notifier.send_start_photo(path, text).await,
            None => notifier.send_start_message(text).await,
        };

        match result {
            Ok(sent) => StepOutcome::Sent {
                message_id: sent.message_id,
            },
            Err(e) => StepOutcome::failed(&e),
        }
    }

    /// Delete step, then end step. `fallback_text` replaces an empty end text.
    async fn stop_steps(
        &self,
        notifier: &mut dyn ChatNotifier,
        notifications: &NotificationConfig,
        event: StreamEvent,
        fallback_text: Option<&str>,
        report: &mut EventReport,
    ) {
        let delete = if !notifications.delete_start_message {
            StepOutcome::Skipped {
                reason: SkipReason::Disabled,
            }
        } else {
            match notifier.last_start_message() {
                None => StepOutcome::Skipped {
                    reason: SkipReason::NothingRecorded,
                },
                Some(message_id) => match notifier.delete_last_start_message().await {
                    Ok(()) => StepOutcome::Deleted { message_id },
                    Err(e) => StepOutcome::failed(&e),
                },
            }
        };
        log_step(event, Step::Delete, &delete);
        report.push(Step::Delete, delete);

        let text = match fallback_text {
            Some(fallback) if notifications.end_message.trim().is_empty() => fallback,
            _ => notifications.end_message.as_str(),
        };
        let end = if !notifications.enable_end {
            StepOutcome::Skipped {
                reason: SkipReason::Disabled,
            }
        } else if text.trim().is_empty() {
            StepOutcome::Skipped {
                reason: SkipReason::EmptyText,
            }
        } else {
            match notifier.send_end_message(text).await {
                Ok(sent) => StepOutcome::Sent {
                    message_id: sent.message_id,
                },
                Err(e) => StepOutcome::failed(&e),
            }
        };
        log_step(event, Step::End, &end);
        report.push(Step::End, end);
    }
}

fn log_step(event: StreamEvent, step: Step, outcome: &StepOutcome) {
    match outcome {
        StepOutcome::Sent { message_id } => {
            info!(event = %event, step = %step, message_id, "Notification sent")
        }
        StepOutcome::Deleted { message_id } => {
            info!(event = %event, step = %step, message_id, "Start notification deleted")
        }
        StepOutcome::Skipped { reason } => {
            debug!(event = %event, step = %step, ?reason, "Notification step skipped")
        }
        StepOutcome::Failed { kind, error } => {
            warn!(event = %event, step = %step, ?kind, error = %error, "Notification step failed")
        }
    }
}
