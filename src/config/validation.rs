//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use crate::config::error::ConfigError;
use crate::config::settings::{
    FileSettings, LoggerSettings, NotificationConfig, NotifierSettings, ServerConfig, Settings,
    TelegramConfig,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Upper bound for a single Bot API call
const MAX_TELEGRAM_TIMEOUT: u64 = 300;

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl TelegramConfig {
    /// Validate Bot API settings
    ///
    /// Empty credentials are allowed: the notifier then refuses to send
    /// instead of failing at startup.
    ///
    /// # Validation Rules
    /// - API base URL must use http or https
    /// - Timeout must be between 1 and 300 seconds
    /// - A non-empty token must look like `<bot id>:<secret>`
    /// - A non-empty chat id must be an integer or start with `@`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base_url.trim();
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(ConfigError::ValidationError {
                field: "telegram.api_base_url".to_string(),
                message: format!(
                    "Invalid Bot API URL '{}'. Expected an http:// or https:// URL.",
                    self.api_base_url
                ),
            });
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > MAX_TELEGRAM_TIMEOUT {
            return Err(ConfigError::ValidationError {
                field: "telegram.timeout_seconds".to_string(),
                message: format!(
                    "Timeout must be between 1 and {MAX_TELEGRAM_TIMEOUT} seconds, got {}.",
                    self.timeout_seconds
                ),
            });
        }

        let token = self.bot_token.trim();
        if !token.is_empty() && !is_valid_token(token) {
            return Err(ConfigError::validation(
                "telegram.bot_token",
                "Invalid bot token format. Expected '<bot id>:<secret>' as issued by @BotFather.",
            ));
        }

        let chat_id = self.chat_id.trim();
        if !chat_id.is_empty() && !is_valid_chat_id(chat_id) {
            return Err(ConfigError::ValidationError {
                field: "telegram.chat_id".to_string(),
                message: format!(
                    "Invalid chat id '{chat_id}'. Use a numeric id or '@channelusername'."
                ),
            });
        }

        Ok(())
    }
}

fn is_valid_token(token: &str) -> bool {
    match token.split_once(':') {
        Some((bot_id, secret)) => {
            !bot_id.is_empty() && bot_id.chars().all(|c| c.is_ascii_digit()) && !secret.is_empty()
        }
        None => false,
    }
}

fn is_valid_chat_id(chat_id: &str) -> bool {
    if let Some(username) = chat_id.strip_prefix('@') {
        return !username.is_empty();
    }
    chat_id.parse::<i64>().is_ok()
}

impl NotificationConfig {
    /// Validate notification settings
    ///
    /// # Validation Rules
    /// - An enabled photo needs a path
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.photo.enabled
            && self
                .photo
                .path
                .as_ref()
                .is_none_or(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::validation(
                "notifications.photo.path",
                "Photo path is required when the start photo is enabled.",
            ));
        }

        Ok(())
    }
}

impl NotifierSettings {
    /// Validate a notifier settings update
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.telegram.validate()?;
        self.notifications.validate()?;
        Ok(())
    }
}

impl FileSettings {
    /// Validate file settings
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()?;

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// This method validates all sub-configurations and returns the first
    /// validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.telegram.validate()?;
        self.notifications.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::PhotoSettings;
    use std::path::PathBuf;

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    // ========================================================================
    // ServerConfig validation tests
    // ========================================================================

    #[test]
    fn test_server_config_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_server_config_invalid_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "server.port");
    }

    #[test]
    fn test_server_config_invalid_request_timeout() {
        let config = ServerConfig {
            request_timeout: 0,
            ..Default::default()
        };
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "server.request_timeout"
        );
    }

    // ========================================================================
    // TelegramConfig validation tests
    // ========================================================================

    #[test]
    fn test_telegram_config_empty_credentials_are_allowed() {
        assert!(TelegramConfig::default().validate().is_ok());
    }

    #[test]
    fn test_telegram_config_valid() {
        for chat_id in ["42", "-1001234567890", "@my_channel"] {
            let config = TelegramConfig {
                bot_token: "123456:ABC-DEF1234ghIkl".to_string(),
                chat_id: chat_id.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "chat id {chat_id} should be valid");
        }
    }

    #[test]
    fn test_telegram_config_invalid_token() {
        for token in ["no-colon", ":secret", "abc:secret", "123456:"] {
            let config = TelegramConfig {
                bot_token: token.to_string(),
                ..Default::default()
            };
            assert_eq!(
                field_of(config.validate().unwrap_err()),
                "telegram.bot_token",
                "token {token} should be rejected"
            );
        }
    }

    #[test]
    fn test_telegram_config_invalid_chat_id() {
        for chat_id in ["@", "channel", "12ab"] {
            let config = TelegramConfig {
                chat_id: chat_id.to_string(),
                ..Default::default()
            };
            assert_eq!(
                field_of(config.validate().unwrap_err()),
                "telegram.chat_id"
            );
        }
    }

    #[test]
    fn test_telegram_config_invalid_base_url() {
        let config = TelegramConfig {
            api_base_url: "api.telegram.org".to_string(),
            ..Default::default()
        };
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "telegram.api_base_url"
        );
    }

    #[test]
    fn test_telegram_config_timeout_bounds() {
        for (timeout, ok) in [(0, false), (1, true), (300, true), (301, false)] {
            let config = TelegramConfig {
                timeout_seconds: timeout,
                ..Default::default()
            };
            assert_eq!(config.validate().is_ok(), ok, "timeout {timeout}");
        }
    }

    // ========================================================================
    // NotificationConfig validation tests
    // ========================================================================

    #[test]
    fn test_photo_enabled_without_path() {
        let config = NotificationConfig {
            photo: PhotoSettings {
                enabled: true,
                path: None,
            },
            ..Default::default()
        };
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "notifications.photo.path"
        );
    }

    #[test]
    fn test_photo_disabled_without_path_ok() {
        let config = NotificationConfig {
            photo: PhotoSettings {
                enabled: false,
                path: None,
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_photo_path_existence_is_not_checked() {
        // Missing files are reported when the photo is sent.
        let config = NotificationConfig {
            photo: PhotoSettings {
                enabled: true,
                path: Some(PathBuf::from("/does/not/exist.png")),
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    // ========================================================================
    // LoggerSettings validation tests
    // ========================================================================

    #[test]
    fn test_logger_settings_valid_levels() {
        for level in VALID_LOG_LEVELS {
            let settings = LoggerSettings {
                level: level.to_uppercase(),
                ..Default::default()
            };
            assert!(settings.validate().is_ok());
        }
    }

    #[test]
    fn test_logger_settings_invalid_level() {
        let settings = LoggerSettings {
            level: "verbose".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.level");
    }

    #[test]
    fn test_logger_settings_file_enabled_empty_path() {
        let settings = LoggerSettings {
            file: FileSettings {
                enabled: true,
                path: "  ".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "logger.file.path"
        );
    }

    #[test]
    fn test_logger_settings_invalid_format() {
        let settings = LoggerSettings {
            file: FileSettings {
                format: "xml".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "logger.file.format"
        );
    }

    // ========================================================================
    // Settings validation tests
    // ========================================================================

    #[test]
    fn test_settings_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_settings_reports_first_invalid_section() {
        let settings = Settings {
            telegram: TelegramConfig {
                chat_id: "nope".to_string(),
                ..Default::default()
            },
            logger: LoggerSettings {
                level: "invalid".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "telegram.chat_id");
    }

    #[test]
    fn test_notifier_settings_validate() {
        let mut notifier = Settings::default().notifier();
        assert!(notifier.validate().is_ok());

        notifier.notifications.photo.enabled = true;
        assert_eq!(
            field_of(notifier.validate().unwrap_err()),
            "notifications.photo.path"
        );
    }
}
