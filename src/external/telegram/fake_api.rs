//! In-process stand-in for the Bot API used by tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use serde_json::{Value, json};

use crate::config::TelegramConfig;

pub const TOKEN: &str = "123456:TEST-TOKEN";

/// Toggles for failure scenarios.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeBehavior {
    /// `deleteMessage` answers with `ok: false`
    pub reject_delete: bool,
    /// `sendMessage` and `sendPhoto` answer without a `message_id`
    pub malformed_messages: bool,
    /// Every call is recorded on arrival and answered after this delay
    pub response_delay: Option<Duration>,
}

/// A request the fake received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub token: String,
    pub method: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedCall {
    /// Decodes an `application/x-www-form-urlencoded` body.
    pub fn form(&self) -> HashMap<String, String> {
        let query = String::from_utf8_lossy(&self.body);
        reqwest::Url::parse(&format!("http://fake/?{query}"))
            .map(|url| url.query_pairs().into_owned().collect())
            .unwrap_or_default()
    }
}

#[derive(Default)]
struct FakeState {
    behavior: FakeBehavior,
    next_message_id: i64,
    calls: Vec<RecordedCall>,
}

type SharedFake = Arc<Mutex<FakeState>>;

pub struct FakeBotApi {
    base_url: String,
    state: SharedFake,
}

impl FakeBotApi {
    pub async fn start() -> Self {
        Self::start_with(FakeBehavior::default()).await
    }

    pub async fn start_with(behavior: FakeBehavior) -> Self {
        let state = Arc::new(Mutex::new(FakeState {
            behavior,
            next_message_id: 100,
            calls: Vec::new(),
        }));

        let app = Router::new()
            .route("/{token}/{method}", post(handle))
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{address}"),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Telegram settings pointing at this fake.
    pub fn telegram_config(&self, bot_token: &str, chat_id: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
            api_base_url: self.base_url.clone(),
            timeout_seconds: 5,
            ..Default::default()
        }
    }
}

async fn handle(
    State(state): State<SharedFake>,
    Path((token, method)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let delay = {
        let mut fake = state.lock().unwrap();
        fake.calls.push(RecordedCall {
            token: token.clone(),
            method: method.clone(),
            content_type: headers
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            body: body.to_vec(),
        });
        fake.behavior.response_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut state = state.lock().unwrap();

    if token != format!("bot{TOKEN}") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"ok": false, "error_code": 401, "description": "Unauthorized"})),
        );
    }

    match method.as_str() {
        "sendMessage" | "sendPhoto" => {
            if state.behavior.malformed_messages {
                return (StatusCode::OK, Json(json!({"ok": true, "result": {}})));
            }
            let message_id = state.next_message_id;
            state.next_message_id += 1;
            (
                StatusCode::OK,
                Json(json!({
                    "ok": true,
                    "result": {"message_id": message_id, "chat": {"id": 42}, "date": 0}
                })),
            )
        }
        "deleteMessage" if state.behavior.reject_delete => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: message to delete not found"
            })),
        ),
        "deleteMessage" => (StatusCode::OK, Json(json!({"ok": true, "result": true}))),
        "getMe" => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "result": {
                    "id": 123456,
                    "is_bot": true,
                    "first_name": "Herald",
                    "username": "herald_test_bot"
                }
            })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"ok": false, "error_code": 404, "description": "Not Found"})),
        ),
    }
}
