//! Worker-to-observer events.
//!
//! The worker never calls back into the presentation layer; it pushes
//! events onto an `mpsc` channel and moves on. Observers (CLI, tray, ...)
//! drain the channel at their own pace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityKind;
use crate::engine::SuppressionReason;

/// Every observable state change in the worker produces an Event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    WorkerStarted {
        at: DateTime<Utc>,
    },
    WorkerStopped {
        at: DateTime<Utc>,
    },
    /// A round of synthetic activity was emitted successfully.
    ActivityEmitted {
        kind: ActivityKind,
        at: DateTime<Utc>,
    },
    /// Emission was attempted and failed; the loop continues.
    ActivityFailed {
        message: String,
        at: DateTime<Utc>,
    },
    /// The suppression verdict changed since the previous tick.
    SuppressionChanged {
        suppressed: bool,
        reason: Option<SuppressionReason>,
        at: DateTime<Utc>,
    },
}
