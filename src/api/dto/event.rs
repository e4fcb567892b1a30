//! Stream event request DTOs.

use serde::Deserialize;

use crate::services::StreamEvent;

/// Body of `POST /api/events`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EventRequest {
    pub event: StreamEvent,
}
