//! Structural representations of board entities for persistence.
//!
//! Snapshots are plain field-for-field data. Converting back into entities
//! goes through [`Task::from_snapshot`](super::Task::from_snapshot) and
//! [`Board::from_snapshot`](super::Board::from_snapshot), which re-check
//! every entity invariant.

use super::{ActivityEntry, BoardId, TaskId, UserName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field-for-field representation of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// Task identifier.
    pub id: TaskId,
    /// Free-form description.
    pub description: String,
    /// User who created the task.
    pub creator: UserName,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Voters in the order their votes were cast.
    #[serde(default)]
    pub voters: Vec<UserName>,
    /// Current assignee, if any.
    #[serde(default)]
    pub assigned: Option<UserName>,
    /// Instant of the current assignment, if any.
    #[serde(default)]
    pub assigned_at: Option<DateTime<Utc>>,
    /// Whether the task has been completed.
    #[serde(default)]
    pub completed: bool,
    /// Completion instant, if completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Activity history, oldest first.
    #[serde(default)]
    pub log: Vec<ActivityEntry>,
}

/// Field-for-field representation of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Board identifier.
    pub id: BoardId,
    /// Active tasks in board order.
    #[serde(default)]
    pub tasks: Vec<TaskSnapshot>,
    /// Archived tasks in archival order.
    #[serde(default)]
    pub archive: Vec<TaskSnapshot>,
}
