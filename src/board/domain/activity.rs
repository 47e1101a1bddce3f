//! Append-only activity history kept by each task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successful state-changing action recorded on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Instant the action succeeded.
    pub at: DateTime<Utc>,
    /// Human-readable description of the action.
    pub message: String,
}

impl ActivityEntry {
    /// Creates an entry for an action that happened at `at`.
    #[must_use]
    pub fn new(at: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            at,
            message: message.into(),
        }
    }
}
