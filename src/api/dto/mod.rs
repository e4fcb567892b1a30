//! Data Transfer Objects for API requests and responses.
//!
//! Report and status bodies are the service types themselves; this module
//! only holds what is specific to the HTTP surface.

mod error;
mod event;
mod health;

pub use error::ErrorResponse;
pub use event::EventRequest;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
