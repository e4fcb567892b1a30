//! Stream lifecycle event handlers.
//!
//! Every event is answered with `200 OK` and the `EventReport`; a failed
//! Bot API call shows up as a failed step, not as an HTTP error. Events run
//! detached from the request, so a caller that hangs up cannot cut one short.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};

use crate::api::dto::EventRequest;
use crate::api::extract::AppJson;
use crate::error::{AppError, AppResult};
use crate::services::StreamEvent;
use crate::services::notifications::EventReport;
use crate::state::AppState;

/// Routes:
/// - POST /events          - Event in a JSON body
/// - POST /events/{event}  - `started` or `stopped` in the path
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(post_event))
        .route("/events/{event}", post(post_named_event))
}

async fn post_event(
    State(state): State<AppState>,
    AppJson(payload): AppJson<EventRequest>,
) -> AppResult<Json<EventReport>> {
    dispatch(&state, payload.event).await
}

async fn post_named_event(
    State(state): State<AppState>,
    Path(event): Path<String>,
) -> AppResult<Json<EventReport>> {
    let event: StreamEvent = event
        .parse()
        .map_err(|message| AppError::BadRequest { message })?;
    dispatch(&state, event).await
}

async fn dispatch(state: &AppState, event: StreamEvent) -> AppResult<Json<EventReport>> {
    let report = state
        .detached(move |service| async move { service.handle_event(event).await })
        .await?;
    Ok(Json(report))
}
