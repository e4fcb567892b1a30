//! Stream lifecycle events and the per-event report.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::external::telegram::{FailureKind, MessageId, TelegramError};

/// Lifecycle event emitted by the streaming application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamEvent {
    Started,
    Stopped,
}

impl StreamEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamEvent::Started => "started",
            StreamEvent::Stopped => "stopped",
        }
    }
}

impl fmt::Display for StreamEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "started" | "start" => Ok(StreamEvent::Started),
            "stopped" | "stop" | "end" => Ok(StreamEvent::Stopped),
            other => Err(format!(
                "unknown stream event '{other}', expected 'started' or 'stopped'"
            )),
        }
    }
}

/// One action taken while handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Start notification, as text or photo
    Start,
    /// Removal of the recorded start notification
    Delete,
    /// End notification
    End,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Start => "start",
            Step::Delete => "delete",
            Step::End => "end",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a step did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Turned off in the notification settings
    Disabled,
    /// Configured text is empty
    EmptyText,
    /// No start notification is recorded
    NothingRecorded,
}

/// What happened to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Sent {
        message_id: MessageId,
    },
    Deleted {
        message_id: MessageId,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        kind: FailureKind,
        error: String,
    },
}

impl StepOutcome {
    pub fn failed(error: &TelegramError) -> Self {
        StepOutcome::Failed {
            kind: error.kind(),
            error: error.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Everything that happened while handling one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventReport {
    pub event: StreamEvent,
    pub steps: Vec<StepReport>,
}

impl EventReport {
    pub fn new(event: StreamEvent) -> Self {
        Self {
            event,
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: Step, outcome: StepOutcome) {
        self.steps.push(StepReport { step, outcome });
    }

    /// Outcome of the given step, if it was reached.
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|report| report.step == step)
            .map(|report| &report.outcome)
    }

    pub fn has_failures(&self) -> bool {
        self.steps.iter().any(|report| report.outcome.is_failure())
    }
}
