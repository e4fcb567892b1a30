//! Service layer.
//!
//! Services hold the domain logic and sit between the HTTP handlers and the
//! external Bot API client.

pub mod notifications;

pub use notifications::{NotificationService, NotifierStatus, StreamEvent};
