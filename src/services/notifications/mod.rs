//! Stream notifications.
//!
//! Lifecycle events come in, chat messages go out. The `ChatNotifier` trait
//! is the seam between the event logic and the Bot API client.

mod events;
mod notifier;

pub mod notification_service;

pub use events::{EventReport, SkipReason, Step, StepOutcome, StepReport, StreamEvent};
pub use notification_service::{NotificationService, NotifierStatus};
pub use notifier::ChatNotifier;
