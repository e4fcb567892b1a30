//! HTTP surface of the event adapter.
//!
//! The streaming app (or a script hooked into it) posts lifecycle events
//! here; operators use the status, settings and test endpoints.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
