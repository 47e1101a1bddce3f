//! Board aggregate: active and archived tasks plus the assignment policy.

use super::{
    BoardDomainError, BoardId, BoardSnapshot, SnapshotError, Task, TaskId, TaskSnapshot, UserName,
};
use mockable::Clock;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Counts describing the current contents of a board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    /// Tasks not yet archived.
    pub active: usize,
    /// Active tasks that are neither assigned nor completed.
    pub unassigned: usize,
    /// Active tasks with an assignee that are not completed.
    pub assigned: usize,
    /// Active tasks that are completed.
    pub completed: usize,
    /// Archived tasks.
    pub archived: usize,
}

/// The shared task board.
///
/// The board owns every task it holds. Callers address tasks by
/// [`TaskId`]; state changes are always performed by the task's own
/// operations, the board only locates, selects and archives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    id: BoardId,
    tasks: Vec<Task>,
    archive: Vec<Task>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub const fn new(id: BoardId) -> Self {
        Self {
            id,
            tasks: Vec::new(),
            archive: Vec::new(),
        }
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> &BoardId {
        &self.id
    }

    /// Adds a task to the end of the active list.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateIdentity`] when a task with the
    /// same identifier is active or archived.
    pub fn add_task(&mut self, task: Task) -> Result<TaskId, BoardDomainError> {
        let id = task.id();
        if self.knows(id) {
            return Err(BoardDomainError::DuplicateIdentity(id));
        }
        self.tasks.push(task);
        Ok(id)
    }

    /// Returns the active task with the identifier.
    ///
    /// Archived tasks are not reachable through this lookup.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NotFound`] when no active task matches.
    pub fn task(&self, id: TaskId) -> Result<&Task, BoardDomainError> {
        self.tasks
            .iter()
            .find(|task| task.id() == id)
            .ok_or(BoardDomainError::NotFound(id))
    }

    /// Returns active tasks ordered by descending vote count.
    ///
    /// Tasks with equal votes keep their board order.
    #[must_use]
    pub fn tasks(&self) -> Vec<&Task> {
        let mut ordered: Vec<&Task> = self.tasks.iter().collect();
        ordered.sort_by_key(|task| Reverse(task.vote_count()));
        ordered
    }

    /// Returns active tasks with an assignee, ordered as [`Board::tasks`].
    #[must_use]
    pub fn assigned_tasks(&self) -> Vec<&Task> {
        self.tasks()
            .into_iter()
            .filter(|task| task.is_assigned())
            .collect()
    }

    /// Returns archived tasks in the order they were archived.
    #[must_use]
    pub fn archived_tasks(&self) -> &[Task] {
        &self.archive
    }

    /// Moves an active task into the archive.
    ///
    /// Archival does not depend on the task's state and cannot be undone.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NotFound`] when no active task matches.
    pub fn archive_task(&mut self, id: TaskId) -> Result<&Task, BoardDomainError> {
        let position = self
            .tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or(BoardDomainError::NotFound(id))?;
        let task = self.tasks.remove(position);
        self.archive.push(task);
        self.archive.last().ok_or(BoardDomainError::NotFound(id))
    }

    /// Records a vote on an active task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NotFound`] for unknown tasks, or the
    /// task's own rejection.
    pub fn vote_for_task(
        &mut self,
        id: TaskId,
        voter: UserName,
        clock: &impl Clock,
    ) -> Result<&Task, BoardDomainError> {
        let task = self.active_task_mut(id)?;
        task.vote(voter, clock)?;
        Ok(task)
    }

    /// Releases the assignee of an active task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NotFound`] for unknown tasks, or the
    /// task's own rejection.
    pub fn unassign_task(
        &mut self,
        id: TaskId,
        requester: &UserName,
        clock: &impl Clock,
    ) -> Result<&Task, BoardDomainError> {
        let task = self.active_task_mut(id)?;
        task.unassign(requester, clock)?;
        Ok(task)
    }

    /// Completes an active task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NotFound`] for unknown tasks, or the
    /// task's own rejection.
    pub fn complete_task(
        &mut self,
        id: TaskId,
        requester: &UserName,
        clock: &impl Clock,
    ) -> Result<&Task, BoardDomainError> {
        let task = self.active_task_mut(id)?;
        task.mark_as_completed(requester, clock)?;
        Ok(task)
    }

    /// Hands the most-voted unassigned task to `assignee`.
    ///
    /// Candidates are active tasks with no assignee. Among candidates with
    /// equal votes the one earliest in board order wins.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NoEligibleTask`] when there is no
    /// candidate. A rejection from [`Task::assign`] is returned unchanged,
    /// so a completed candidate yields
    /// [`TaskDomainError::AlreadyCompleted`](super::TaskDomainError::AlreadyCompleted).
    pub fn assign_highest_voted_unassigned(
        &mut self,
        assignee: UserName,
        clock: &impl Clock,
    ) -> Result<&Task, BoardDomainError> {
        let task = self
            .tasks
            .iter_mut()
            .filter(|task| !task.is_assigned())
            .min_by_key(|task| Reverse(task.vote_count()))
            .ok_or(BoardDomainError::NoEligibleTask)?;
        task.assign(assignee, clock)?;
        Ok(task)
    }

    /// Summarises the board contents.
    #[must_use]
    pub fn stats(&self) -> BoardStats {
        self.tasks.iter().fold(
            BoardStats {
                active: self.tasks.len(),
                archived: self.archive.len(),
                ..BoardStats::default()
            },
            |mut stats, task| {
                if task.is_completed() {
                    stats.completed += 1;
                } else if task.is_assigned() {
                    stats.assigned += 1;
                } else {
                    stats.unassigned += 1;
                }
                stats
            },
        )
    }

    /// Converts the board into its structural representation.
    #[must_use]
    pub fn to_snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            id: self.id.clone(),
            tasks: self.tasks.iter().map(Task::to_snapshot).collect(),
            archive: self.archive.iter().map(Task::to_snapshot).collect(),
        }
    }

    /// Rebuilds a board from its structural representation.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when any task is invalid or a task
    /// identifier appears more than once across active and archive.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Result<Self, SnapshotError> {
        let mut seen = HashSet::new();
        let tasks = rebuild_tasks(snapshot.tasks, &mut seen)?;
        let archive = rebuild_tasks(snapshot.archive, &mut seen)?;
        Ok(Self {
            id: snapshot.id,
            tasks,
            archive,
        })
    }

    fn knows(&self, id: TaskId) -> bool {
        self.tasks
            .iter()
            .chain(self.archive.iter())
            .any(|task| task.id() == id)
    }

    fn active_task_mut(&mut self, id: TaskId) -> Result<&mut Task, BoardDomainError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or(BoardDomainError::NotFound(id))
    }
}

fn rebuild_tasks(
    snapshots: Vec<TaskSnapshot>,
    seen: &mut HashSet<TaskId>,
) -> Result<Vec<Task>, SnapshotError> {
    snapshots
        .into_iter()
        .map(|snapshot| {
            if !seen.insert(snapshot.id) {
                return Err(SnapshotError::DuplicateTask(snapshot.id));
            }
            Task::from_snapshot(snapshot)
        })
        .collect()
}
