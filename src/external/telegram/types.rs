use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier Telegram assigns to a message within a chat.
pub type MessageId = i64;

/// Formatting mode sent with every text and caption.
pub const PARSE_MODE_HTML: &str = "HTML";

/// Bot API methods used by the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    SendMessage,
    DeleteMessage,
    SendPhoto,
    GetMe,
}

impl ApiMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiMethod::SendMessage => "sendMessage",
            ApiMethod::DeleteMessage => "deleteMessage",
            ApiMethod::SendPhoto => "sendPhoto",
            ApiMethod::GetMe => "getMe",
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope shared by every Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub error_code: Option<i64>,
    pub description: Option<String>,
}

/// The part of a Telegram `Message` object the notifier cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    pub message_id: MessageId,
}

/// Result of `getMe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotUser {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Bot token and destination chat.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BotCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl BotCredentials {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Both the token and the chat target are set.
    pub fn is_complete(&self) -> bool {
        !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }
}

impl fmt::Debug for BotCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotCredentials")
            .field("bot_token", &redact_token(&self.bot_token))
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Masks a bot token for logs, keeping only the numeric bot id.
///
/// `123456:ABC-DEF` becomes `123456:***`.
pub fn redact_token(token: &str) -> String {
    if token.is_empty() {
        return String::new();
    }
    match token.split_once(':') {
        Some((bot_id, _)) => format!("{bot_id}:***"),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send_message_response() {
        let body = r#"{"ok":true,"result":{"message_id":77,"chat":{"id":-100123},"text":"hi"}}"#;
        let response: ApiResponse<SentMessage> = serde_json::from_str(body).unwrap();
        assert!(response.ok);
        assert_eq!(response.result, Some(SentMessage { message_id: 77 }));
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;
        let response: ApiResponse<SentMessage> = serde_json::from_str(body).unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(response.error_code, Some(400));
        assert_eq!(
            response.description.as_deref(),
            Some("Bad Request: chat not found")
        );
    }

    #[test]
    fn test_result_without_message_id_is_rejected() {
        let body = r#"{"ok":true,"result":{"chat":{"id":1}}}"#;
        assert!(serde_json::from_str::<ApiResponse<SentMessage>>(body).is_err());
    }

    #[test]
    fn test_credentials_completeness() {
        assert!(BotCredentials::new("1:abc", "42").is_complete());
        assert!(!BotCredentials::new("", "42").is_complete());
        assert!(!BotCredentials::new("1:abc", "").is_complete());
        assert!(!BotCredentials::new("  ", "42").is_complete());
    }

    #[test]
    fn test_debug_output_hides_token() {
        let credentials = BotCredentials::new("123456:SECRET", "42");
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("SECRET"));
        assert!(debug.contains("123456:***"));
    }

    #[test]
    fn test_redact_token() {
        assert_eq!(redact_token(""), "");
        assert_eq!(redact_token("no-colon"), "***");
        assert_eq!(redact_token("42:abc"), "42:***");
    }

    #[test]
    fn test_method_names() {
        assert_eq!(ApiMethod::SendMessage.to_string(), "sendMessage");
        assert_eq!(ApiMethod::DeleteMessage.as_str(), "deleteMessage");
        assert_eq!(ApiMethod::SendPhoto.as_str(), "sendPhoto");
        assert_eq!(ApiMethod::GetMe.as_str(), "getMe");
    }
}
