//! What a training queue does once its countdown reaches zero.
//!
//! The engine only knows the `QueueCompletionPolicy` trait. `Repeat`
//! restarts the countdown indefinitely; `DepleteAndStop` delivers the
//! batch once and leaves the queue idle.

use crate::snapshot::TrainingQueue;
use serde::{Deserialize, Serialize};

/// The contract every completion policy must fulfill.
pub trait QueueCompletionPolicy: Send + Sync {
    /// Unique stable name for logs and reports.
    fn name(&self) -> &'static str;

    /// Called once when `queue` completes, after its batch is reported.
    /// `duration` is the queue's resolved cycle length.
    fn on_complete(&self, queue: &mut TrainingQueue, duration: u64);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Repeat;

impl QueueCompletionPolicy for Repeat {
    fn name(&self) -> &'static str { "repeat" }

    fn on_complete(&self, queue: &mut TrainingQueue, duration: u64) {
        queue.seconds_remaining = Some(duration);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DepleteAndStop;

impl QueueCompletionPolicy for DepleteAndStop {
    fn name(&self) -> &'static str { "deplete_and_stop" }

    fn on_complete(&self, queue: &mut TrainingQueue, _duration: u64) {
        queue.quantity = 0;
        queue.seconds_remaining = Some(0);
    }
}

/// Serializable selector used by `TickConfig`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicyKind {
    #[default]
    Repeat,
    DepleteAndStop,
}

impl CompletionPolicyKind {
    pub fn build(self) -> Box<dyn QueueCompletionPolicy> {
        match self {
            Self::Repeat         => Box::new(Repeat),
            Self::DepleteAndStop => Box::new(DepleteAndStop),
        }
    }

    /// Parse a command-line spelling ("repeat", "deplete", "deplete_and_stop").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "repeat" => Some(Self::Repeat),
            "deplete" | "deplete_and_stop" | "deplete-and-stop" => Some(Self::DepleteAndStop),
            _ => None,
        }
    }
}
