//! Settings and status handlers.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};

use crate::api::extract::AppJson;
use crate::config::NotifierSettings;
use crate::error::AppResult;
use crate::external::telegram::BotUser;
use crate::services::NotifierStatus;
use crate::state::AppState;

/// Routes:
/// - GET  /status           - Sent-message record and effective flags
/// - PUT  /settings         - Live update, keeps the record
/// - POST /settings/reload  - Re-read configuration, clears the record
/// - GET  /bot              - Ask the Bot API who the token belongs to
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/settings", put(update_settings))
        .route("/settings/reload", post(reload_settings))
        .route("/bot", get(get_bot))
}

async fn get_status(State(state): State<AppState>) -> Json<NotifierStatus> {
    Json(state.notifications.status().await)
}

async fn update_settings(
    State(state): State<AppState>,
    AppJson(settings): AppJson<NotifierSettings>,
) -> AppResult<Json<NotifierStatus>> {
    state.notifications.update_settings(settings).await?;
    Ok(Json(state.notifications.status().await))
}

async fn reload_settings(State(state): State<AppState>) -> AppResult<Json<NotifierStatus>> {
    Ok(Json(state.reload().await?))
}

async fn get_bot(State(state): State<AppState>) -> AppResult<Json<BotUser>> {
    Ok(Json(state.notifications.check_bot().await?))
}
