//! Error types for task and board operations.

use super::{TaskId, UserName};
use std::fmt;
use thiserror::Error;

/// Task transition that requires the caller to hold authority over the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    /// Releasing the current assignee.
    Unassign,
    /// Marking the task as completed.
    Complete,
}

impl TaskAction {
    /// Returns the verb used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unassign => "unassign",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by task operations and domain value construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task is completed and accepts no further mutation.
    #[error("task {0} is already completed")]
    AlreadyCompleted(TaskId),

    /// The voter has already voted for the task.
    #[error("{voter} has already voted for task {task_id}")]
    DuplicateVote {
        /// Task that received the vote.
        task_id: TaskId,
        /// Voter that was rejected.
        voter: UserName,
    },

    /// The task already has an assignee.
    #[error("task {task_id} is already assigned to {assignee}")]
    AlreadyAssigned {
        /// Task that was requested.
        task_id: TaskId,
        /// Current assignee.
        assignee: UserName,
    },

    /// The task has no assignee to release.
    #[error("task {0} is not assigned")]
    NotAssigned(TaskId),

    /// The requester lacks authority for the transition.
    #[error("{requester} is not allowed to {action} task {task_id}")]
    Forbidden {
        /// Task that was requested.
        task_id: TaskId,
        /// Caller that was rejected.
        requester: UserName,
        /// Transition that was attempted.
        action: TaskAction,
    },

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The user name is blank.
    #[error("invalid user name '{0}'")]
    InvalidUserName(String),

    /// The board identifier cannot be used as a storage key.
    #[error("invalid board identifier '{0}', expected letters, digits, '-', '_' or '.'")]
    InvalidBoardId(String),
}

/// Errors returned by board-level operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// A task operation rejected the request.
    #[error(transparent)]
    Task(#[from] TaskDomainError),

    /// No active task has the identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// A task with the identifier is already active or archived.
    #[error("task {0} already exists on this board")]
    DuplicateIdentity(TaskId),

    /// Every active task already has an assignee.
    #[error("no unassigned tasks")]
    NoEligibleTask,
}

/// Errors returned while rebuilding entities from structural snapshots.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// A scalar value failed domain validation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// `assigned` and `assigned_at` are not both set or both unset.
    #[error("task {0} has an inconsistent assignment")]
    InconsistentAssignment(TaskId),

    /// `completed_at` is set without `completed`, or the reverse.
    #[error("task {0} has an inconsistent completion")]
    InconsistentCompletion(TaskId),

    /// A voter appears more than once.
    #[error("task {task_id} lists voter {voter} more than once")]
    DuplicateVoter {
        /// Task with the repeated voter.
        task_id: TaskId,
        /// Repeated voter.
        voter: UserName,
    },

    /// A task identifier appears more than once across active and archive.
    #[error("task {0} appears more than once on the board")]
    DuplicateTask(TaskId),
}
