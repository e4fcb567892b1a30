//! Router configuration for the API.

use std::time::Duration;

use axum::{Router, middleware};
use tower_http::timeout::TimeoutLayer;

use crate::api::handlers;
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Layers run outermost first:
/// 1. Request ID - generates or propagates `x-request-id`
/// 2. Logging - request/response logs inside a span carrying the id
/// 3. Error normalization - plain-text errors become `ErrorResponse`
/// 4. Timeout - bounds health and settings requests by `server.request_timeout`
///
/// Event and test routes are left out of the timeout. Their Bot API calls are
/// bounded by `telegram.timeout_seconds` and run on their own task.
///
/// # Routes
/// - `/health`, `/health/live`, `/health/ready`
/// - `/api/events`, `/api/events/{event}`
/// - `/api/test/{action}`
/// - `/api/status`, `/api/settings`, `/api/settings/reload`, `/api/bot`
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let timeout = TimeoutLayer::new(request_timeout);

    let api_routes = Router::new()
        .merge(handlers::events::event_routes())
        .merge(handlers::manual::manual_routes())
        .merge(handlers::settings::settings_routes().layer(timeout.clone()));

    Router::new()
        .merge(handlers::health::health_routes().layer(timeout))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
