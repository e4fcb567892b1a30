//! Telegram Bot API client.
//!
//! Wraps the three calls the notifier needs (`sendMessage`, `deleteMessage`,
//! `sendPhoto`) plus `getMe` for credential checks, and remembers the id of
//! the last start notification so a later stop event can delete it.
//!
//! Bot API reference: https://core.telegram.org/bots/api

use std::path::Path;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::{TelegramError, TelegramResult};
use super::multipart::{MultipartForm, guess_mime_type};
use super::types::{
    ApiMethod, ApiResponse, BotCredentials, BotUser, MessageId, PARSE_MODE_HTML, SentMessage,
};
use crate::config::TelegramConfig;
use crate::external::client::build_http_client;

/// Telegram bot client bound to a single chat.
///
/// # Example
/// ```ignore
/// let mut bot = TelegramBot::new(&settings.telegram)?;
/// let sent = bot.send_message("🎥 Stream is live!").await?;
/// // ... later, on stop
/// bot.delete_last_start_message().await?;
/// ```
pub struct TelegramBot {
    http: reqwest::Client,
    api_base_url: String,
    credentials: BotCredentials,
    disable_web_page_preview: bool,
    timeout: Duration,
    last_start_message: Option<MessageId>,
}

impl TelegramBot {
    /// Creates a client from the `[telegram]` settings section.
    pub fn new(config: &TelegramConfig) -> TelegramResult<Self> {
        let http = build_http_client()
            .map_err(|e| TelegramError::from_reqwest(ApiMethod::GetMe, e))?;
        Ok(Self::with_client(http, config))
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, config: &TelegramConfig) -> Self {
        Self {
            http,
            api_base_url: config.api_base_url.clone(),
            credentials: config.credentials(),
            disable_web_page_preview: config.disable_web_page_preview,
            timeout: config.timeout(),
            last_start_message: None,
        }
    }

    /// Applies new settings; the sent-message record is kept.
    pub fn update_config(&mut self, config: &TelegramConfig) {
        self.api_base_url = config.api_base_url.clone();
        self.credentials = config.credentials();
        self.disable_web_page_preview = config.disable_web_page_preview;
        self.timeout = config.timeout();
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_complete()
    }

    /// Id of the last start notification, if it has not been deleted yet.
    pub fn last_start_message(&self) -> Option<MessageId> {
        self.last_start_message
    }

    pub fn clear_last_start_message(&mut self) {
        self.last_start_message = None;
    }

    /// Sends a start notification and records its id for a later delete.
    pub async fn send_message(&mut self, text: &str) -> TelegramResult<SentMessage> {
        let sent = self.post_message(text).await?;
        self.last_start_message = Some(sent.message_id);
        Ok(sent)
    }

    /// Sends a message without touching the sent-message record.
    pub async fn send_untracked_message(&self, text: &str) -> TelegramResult<SentMessage> {
        self.post_message(text).await
    }

    /// Deletes a message from the configured chat.
    pub async fn delete_message(&self, message_id: MessageId) -> TelegramResult<()> {
        if message_id <= 0 {
            return Err(TelegramError::InvalidMessageId(message_id));
        }
        self.ensure_credentials()?;

        let message_id_field = message_id.to_string();
        let form = [
            ("chat_id", self.credentials.chat_id.as_str()),
            ("message_id", message_id_field.as_str()),
        ];
        let request = self
            .http
            .post(self.endpoint(ApiMethod::DeleteMessage))
            .timeout(self.timeout)
            .form(&form);

        let deleted: bool = self.execute(ApiMethod::DeleteMessage, request).await?;
        if !deleted {
            return Err(TelegramError::Api {
                method: ApiMethod::DeleteMessage,
                error_code: None,
                description: "message was not deleted".to_string(),
            });
        }

        debug!(
            chat_id = %self.credentials.chat_id,
            message_id,
            "Telegram message deleted"
        );
        Ok(())
    }

    /// Deletes the recorded start notification and clears the record on success.
    pub async fn delete_last_start_message(&mut self) -> TelegramResult<()> {
        let message_id = self
            .last_start_message
            .ok_or(TelegramError::NothingToDelete)?;

        self.delete_message(message_id).await?;
        self.last_start_message = None;
        Ok(())
    }

    /// Sends a photo as a start notification and records its id.
    ///
    /// A missing file is reported before anything is read or sent. An empty
    /// caption leaves out both the `caption` and `parse_mode` parts.
    pub async fn send_photo(&mut self, path: &Path, caption: &str) -> TelegramResult<SentMessage> {
        if !path.exists() {
            return Err(TelegramError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        self.ensure_credentials()?;

        let data = tokio::fs::read(path)
            .await
            .map_err(|source| TelegramError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        let mime_type = guess_mime_type(path);

        let form = build_photo_form(
            MultipartForm::new(),
            &self.credentials.chat_id,
            &filename,
            mime_type,
            &data,
            caption,
        );
        let content_type = form.content_type();
        let request = self
            .http
            .post(self.endpoint(ApiMethod::SendPhoto))
            .timeout(self.timeout)
            .header(CONTENT_TYPE, content_type)
            .body(form.finish());

        let sent: SentMessage = self.execute(ApiMethod::SendPhoto, request).await?;
        debug!(
            chat_id = %self.credentials.chat_id,
            message_id = sent.message_id,
            filename = %filename,
            mime_type,
            "Telegram photo sent"
        );
        self.last_start_message = Some(sent.message_id);
        Ok(sent)
    }

    /// Calls `getMe` to check that the token is accepted.
    pub async fn get_me(&self) -> TelegramResult<BotUser> {
        if self.credentials.bot_token.trim().is_empty() {
            return Err(TelegramError::MissingCredentials);
        }
        let request = self
            .http
            .post(self.endpoint(ApiMethod::GetMe))
            .timeout(self.timeout);
        self.execute(ApiMethod::GetMe, request).await
    }

    async fn post_message(&self, text: &str) -> TelegramResult<SentMessage> {
        self.ensure_credentials()?;

        let disable_preview = if self.disable_web_page_preview {
            "true"
        } else {
            "false"
        };
        let form = [
            ("disable_web_page_preview", disable_preview),
            ("chat_id", self.credentials.chat_id.as_str()),
            ("text", text),
            ("parse_mode", PARSE_MODE_HTML),
        ];
        let request = self
            .http
            .post(self.endpoint(ApiMethod::SendMessage))
            .timeout(self.timeout)
            .form(&form);

        let sent: SentMessage = self.execute(ApiMethod::SendMessage, request).await?;
        debug!(
            chat_id = %self.credentials.chat_id,
            message_id = sent.message_id,
            "Telegram message sent"
        );
        Ok(sent)
    }

    fn ensure_credentials(&self) -> TelegramResult<()> {
        if self.credentials.is_complete() {
            Ok(())
        } else {
            Err(TelegramError::MissingCredentials)
        }
    }

    fn endpoint(&self, method: ApiMethod) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.credentials.bot_token,
            method
        )
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: ApiMethod,
        request: reqwest::RequestBuilder,
    ) -> TelegramResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| TelegramError::from_reqwest(method, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TelegramError::from_reqwest(method, e))?;

        let result = parse_response(method, &body);
        if let Err(err) = &result {
            warn!(
                method = %method,
                status = status.as_u16(),
                error = %err,
                "Bot API call failed"
            );
        }
        result
    }
}

/// Lays out the `sendPhoto` parts in the order the Bot API expects.
pub(crate) fn build_photo_form(
    form: MultipartForm,
    chat_id: &str,
    filename: &str,
    mime_type: &str,
    data: &[u8],
    caption: &str,
) -> MultipartForm {
    let form = form
        .text("chat_id", chat_id)
        .file("photo", filename, mime_type, data);
    if caption.is_empty() {
        form
    } else {
        form.text("caption", caption)
            .text("parse_mode", PARSE_MODE_HTML)
    }
}

/// Unwraps the `{ok, result}` envelope.
pub(crate) fn parse_response<T: DeserializeOwned>(
    method: ApiMethod,
    body: &[u8],
) -> TelegramResult<T> {
    let envelope: ApiResponse<T> =
        serde_json::from_slice(body).map_err(|e| TelegramError::Protocol {
            method,
            reason: e.to_string(),
        })?;

    if !envelope.ok {
        return Err(TelegramError::Api {
            method,
            error_code: envelope.error_code,
            description: envelope
                .description
                .unwrap_or_else(|| "no description".to_string()),
        });
    }

    envelope.result.ok_or_else(|| TelegramError::Protocol {
        method,
        reason: "missing result".to_string(),
    })
}
