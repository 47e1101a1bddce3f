//! Task entity and its lifecycle rules.

use super::{
    ActivityEntry, SnapshotError, TaskAction, TaskDomainError, TaskId, TaskSnapshot, UserName,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashSet;

/// Lifecycle state derived from a task's assignment and completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Nobody has claimed the task.
    Unassigned,
    /// One user has claimed the task.
    Assigned,
    /// The task is done. Terminal.
    Completed,
}

impl TaskState {
    /// Returns the canonical display representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
        }
    }

    /// Returns `true` when no further transition is accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Assignment {
    assignee: UserName,
    assigned_at: DateTime<Utc>,
}

/// A unit of work that can be voted on, claimed and completed.
///
/// Every successful operation appends exactly one [`ActivityEntry`]; a failed
/// operation leaves the task untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    description: String,
    creator: UserName,
    created_at: DateTime<Utc>,
    voters: Vec<UserName>,
    assignment: Option<Assignment>,
    completed_at: Option<DateTime<Utc>>,
    log: Vec<ActivityEntry>,
}

impl Task {
    /// Creates an unassigned task with no votes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] when the description is
    /// blank.
    pub fn new(
        description: impl Into<String>,
        creator: UserName,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let description = validate_description(description.into())?;
        Ok(Self {
            id: TaskId::new(),
            description,
            creator,
            created_at: clock.utc(),
            voters: Vec::new(),
            assignment: None,
            completed_at: None,
            log: Vec::new(),
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the user who created the task.
    #[must_use]
    pub const fn creator(&self) -> &UserName {
        &self.creator
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns voters in the order their votes were cast.
    #[must_use]
    pub fn voters(&self) -> &[UserName] {
        &self.voters
    }

    /// Returns the number of distinct voters.
    #[must_use]
    pub fn vote_count(&self) -> usize {
        self.voters.len()
    }

    /// Returns `true` if `voter` has voted for this task.
    #[must_use]
    pub fn has_voted(&self, voter: &UserName) -> bool {
        self.voters.contains(voter)
    }

    /// Returns the current assignee, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&UserName> {
        self.assignment.as_ref().map(|assignment| &assignment.assignee)
    }

    /// Returns when the current assignment was made, if any.
    #[must_use]
    pub fn assigned_at(&self) -> Option<DateTime<Utc>> {
        self.assignment
            .as_ref()
            .map(|assignment| assignment.assigned_at)
    }

    /// Returns `true` when the task has an assignee.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    /// Returns `true` once the task has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the activity history, oldest first.
    #[must_use]
    pub fn log(&self) -> &[ActivityEntry] {
        &self.log
    }

    /// Returns the derived lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        if self.is_completed() {
            TaskState::Completed
        } else if self.is_assigned() {
            TaskState::Assigned
        } else {
            TaskState::Unassigned
        }
    }

    /// Records a vote from `voter`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] for completed tasks and
    /// [`TaskDomainError::DuplicateVote`] when `voter` has already voted.
    pub fn vote(&mut self, voter: UserName, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_open()?;
        if self.has_voted(&voter) {
            return Err(TaskDomainError::DuplicateVote {
                task_id: self.id,
                voter,
            });
        }

        let message = format!("{voter} voted for task: {}", self.id);
        self.voters.push(voter);
        self.record(clock.utc(), message);
        Ok(())
    }

    /// Claims the task for `assignee`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] for completed tasks and
    /// [`TaskDomainError::AlreadyAssigned`] when someone already holds it.
    pub fn assign(&mut self, assignee: UserName, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_open()?;
        if let Some(current) = self.assignee() {
            return Err(TaskDomainError::AlreadyAssigned {
                task_id: self.id,
                assignee: current.clone(),
            });
        }

        let now = clock.utc();
        let message = format!("{assignee} assigned to task: {}", self.id);
        self.assignment = Some(Assignment {
            assignee,
            assigned_at: now,
        });
        self.record(now, message);
        Ok(())
    }

    /// Releases the current assignee.
    ///
    /// Only a requester who is both the assignee and the creator may do
    /// this.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] for completed tasks,
    /// [`TaskDomainError::NotAssigned`] when nobody holds the task and
    /// [`TaskDomainError::Forbidden`] when the requester lacks authority.
    pub fn unassign(
        &mut self,
        requester: &UserName,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_open()?;
        let assignee = self
            .assignee()
            .cloned()
            .ok_or(TaskDomainError::NotAssigned(self.id))?;
        if *requester != assignee || *requester != self.creator {
            return Err(self.forbidden(requester, TaskAction::Unassign));
        }

        self.assignment = None;
        let message = format!("{assignee} unassigned from task: {}", self.id);
        self.record(clock.utc(), message);
        Ok(())
    }

    /// Completes the task on behalf of its creator or current assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] for completed tasks and
    /// [`TaskDomainError::Forbidden`] when the requester is neither the
    /// creator nor the assignee.
    pub fn mark_as_completed(
        &mut self,
        requester: &UserName,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_open()?;
        let is_creator = *requester == self.creator;
        let is_assignee = self.assignee() == Some(requester);
        if !is_creator && !is_assignee {
            return Err(self.forbidden(requester, TaskAction::Complete));
        }

        let now = clock.utc();
        self.completed_at = Some(now);
        let message = format!(
            "Task \"{}\" marked as completed by {requester}",
            self.id
        );
        self.record(now, message);
        Ok(())
    }

    /// Converts the task into its structural representation.
    #[must_use]
    pub fn to_snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            id: self.id,
            description: self.description.clone(),
            creator: self.creator.clone(),
            created_at: self.created_at,
            voters: self.voters.clone(),
            assigned: self.assignee().cloned(),
            assigned_at: self.assigned_at(),
            completed: self.is_completed(),
            completed_at: self.completed_at,
            log: self.log.clone(),
        }
    }

    /// Rebuilds a task from its structural representation.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the snapshot violates a task invariant:
    /// a blank description, a half-set assignment or completion, or a
    /// repeated voter.
    pub fn from_snapshot(snapshot: TaskSnapshot) -> Result<Self, SnapshotError> {
        let TaskSnapshot {
            id,
            description,
            creator,
            created_at,
            voters,
            assigned,
            assigned_at,
            completed,
            completed_at,
            log,
        } = snapshot;

        let description = validate_description(description)?;

        let assignment = match (assigned, assigned_at) {
            (Some(assignee), Some(at)) => Some(Assignment {
                assignee,
                assigned_at: at,
            }),
            (None, None) => None,
            _ => return Err(SnapshotError::InconsistentAssignment(id)),
        };

        if completed != completed_at.is_some() {
            return Err(SnapshotError::InconsistentCompletion(id));
        }

        if let Some(repeated) = first_repeated(&voters) {
            return Err(SnapshotError::DuplicateVoter {
                task_id: id,
                voter: repeated.clone(),
            });
        }

        Ok(Self {
            id,
            description,
            creator,
            created_at,
            voters,
            assignment,
            completed_at,
            log,
        })
    }

    const fn ensure_open(&self) -> Result<(), TaskDomainError> {
        if self.is_completed() {
            return Err(TaskDomainError::AlreadyCompleted(self.id));
        }
        Ok(())
    }

    fn forbidden(&self, requester: &UserName, action: TaskAction) -> TaskDomainError {
        TaskDomainError::Forbidden {
            task_id: self.id,
            requester: requester.clone(),
            action,
        }
    }

    fn record(&mut self, at: DateTime<Utc>, message: String) {
        self.log.push(ActivityEntry::new(at, message));
    }
}

fn validate_description(description: String) -> Result<String, TaskDomainError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyDescription);
    }
    Ok(trimmed.to_owned())
}

fn first_repeated(voters: &[UserName]) -> Option<&UserName> {
    let mut seen = HashSet::with_capacity(voters.len());
    voters.iter().find(|voter| !seen.insert(*voter))
}
