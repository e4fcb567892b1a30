//! Manual test triggers.
//!
//! Unlike real events these fail with an error response when the Bot API
//! cannot be reached at all (missing credentials).

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};

use crate::error::{AppError, AppResult};
use crate::services::notifications::EventReport;
use crate::state::AppState;

/// Routes:
/// - POST /test/start - Send the start notification now
/// - POST /test/end   - Run the stop side now
pub fn manual_routes() -> Router<AppState> {
    Router::new().route("/test/{action}", post(trigger))
}

async fn trigger(
    State(state): State<AppState>,
    Path(action): Path<String>,
) -> AppResult<Json<EventReport>> {
    let report = match action.as_str() {
        "start" => {
            state
                .detached(|service| async move { service.test_start().await })
                .await??
        }
        "end" | "stop" => {
            state
                .detached(|service| async move { service.test_end().await })
                .await??
        }
        other => {
            return Err(AppError::BadRequest {
                message: format!("unknown test action '{other}', expected 'start' or 'end'"),
            });
        }
    };
    Ok(Json(report))
}
