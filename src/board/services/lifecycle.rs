//! Request handling for a single board.
//!
//! [`BoardService`] plays the part of the request handler: it resolves the
//! caller, runs exactly one domain operation under the board lock, persists
//! the result and hands any rejection back unchanged.

use crate::board::{
    domain::{
        Board, BoardDomainError, BoardId, BoardSnapshot, BoardStats, Task, TaskDomainError,
        TaskId, UserName,
    },
    ports::{BoardRepository, BoardRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Service-level errors for board requests.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// The board or one of its tasks rejected the request.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] BoardRepositoryError),
    /// Mutating requests need an identified caller. A blank identity
    /// counts as anonymous.
    #[error("anonymous users cannot modify the board")]
    AnonymousCaller,
}

impl BoardServiceError {
    /// Returns the HTTP status a transport layer should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Domain(BoardDomainError::NotFound(_)) => 404,
            Self::Domain(BoardDomainError::Task(TaskDomainError::Forbidden { .. }))
            | Self::AnonymousCaller => 403,
            _ => 500,
        }
    }
}

impl From<TaskDomainError> for BoardServiceError {
    fn from(err: TaskDomainError) -> Self {
        Self::Domain(err.into())
    }
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Serialised access to one board.
///
/// Each mutating request applies its operation to a draft copy while holding
/// the board lock, saves the draft, and only then replaces the live board.
/// A rejected operation or a failed save leaves both memory and storage as
/// they were.
pub struct BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    id: BoardId,
    board: Mutex<Board>,
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Restores the board from the repository, or starts an empty one when
    /// nothing is stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when the stored board cannot
    /// be read or is invalid.
    pub async fn open(id: BoardId, repository: Arc<R>, clock: Arc<C>) -> BoardServiceResult<Self> {
        let board = repository.load(&id).await?.map_or_else(
            || {
                info!(board = %id, "no stored board, starting fresh");
                Board::new(id.clone())
            },
            |board| {
                debug!(board = %id, tasks = board.stats().active, "restored board");
                board
            },
        );
        Ok(Self::with_board(board, repository, clock))
    }

    /// Wraps an existing board without touching the repository.
    #[must_use]
    pub fn with_board(board: Board, repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            id: board.id().clone(),
            board: Mutex::new(board),
            repository,
            clock,
        }
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn board_id(&self) -> &BoardId {
        &self.id
    }

    /// Creates a task owned by `caller` and adds it to the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::AnonymousCaller`] for anonymous callers,
    /// domain errors for invalid input, or repository errors.
    pub async fn create_task(
        &self,
        caller: &str,
        description: impl Into<String>,
    ) -> BoardServiceResult<Task> {
        let description = description.into();
        self.mutate(caller, "create", move |board, creator, clock| {
            let task = Task::new(description, creator, clock)?;
            let id = board.add_task(task)?;
            board.task(id).cloned()
        })
        .await
    }

    /// Records the caller's vote on a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::AnonymousCaller`] for anonymous callers,
    /// domain errors from the task, or repository errors.
    pub async fn vote(&self, caller: &str, task_id: TaskId) -> BoardServiceResult<Task> {
        self.mutate(caller, "vote", move |board, voter, clock| {
            board.vote_for_task(task_id, voter, clock).cloned()
        })
        .await
    }

    /// Assigns the most-voted unassigned task to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::AnonymousCaller`] for anonymous callers,
    /// [`BoardDomainError::NoEligibleTask`] when nothing is left to hand out,
    /// or repository errors.
    pub async fn assign_next(&self, caller: &str) -> BoardServiceResult<Task> {
        self.mutate(caller, "assign", |board, assignee, clock| {
            board
                .assign_highest_voted_unassigned(assignee, clock)
                .cloned()
        })
        .await
    }

    /// Releases the assignee of a task on the caller's behalf.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::AnonymousCaller`] for anonymous callers,
    /// domain errors from the task, or repository errors.
    pub async fn unassign(&self, caller: &str, task_id: TaskId) -> BoardServiceResult<Task> {
        self.mutate(caller, "unassign", move |board, requester, clock| {
            board.unassign_task(task_id, &requester, clock).cloned()
        })
        .await
    }

    /// Marks a task as completed on the caller's behalf.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::AnonymousCaller`] for anonymous callers,
    /// domain errors from the task, or repository errors.
    pub async fn complete(&self, caller: &str, task_id: TaskId) -> BoardServiceResult<Task> {
        self.mutate(caller, "complete", move |board, requester, clock| {
            board.complete_task(task_id, &requester, clock).cloned()
        })
        .await
    }

    /// Moves a task into the archive.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::AnonymousCaller`] for anonymous callers,
    /// [`BoardDomainError::NotFound`] for unknown tasks, or repository
    /// errors.
    pub async fn archive(&self, caller: &str, task_id: TaskId) -> BoardServiceResult<Task> {
        self.mutate(caller, "archive", move |board, _, _| {
            board.archive_task(task_id).cloned()
        })
        .await
    }

    /// Returns an active task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NotFound`] when no active task matches.
    pub async fn task(&self, task_id: TaskId) -> BoardServiceResult<Task> {
        Ok(self.board.lock().await.task(task_id).cloned()?)
    }

    /// Returns active tasks ordered by descending vote count.
    pub async fn tasks(&self) -> Vec<Task> {
        self.board
            .lock()
            .await
            .tasks()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Returns assigned active tasks ordered by descending vote count.
    pub async fn assigned_tasks(&self) -> Vec<Task> {
        self.board
            .lock()
            .await
            .assigned_tasks()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Returns archived tasks in archival order.
    pub async fn archived_tasks(&self) -> Vec<Task> {
        self.board.lock().await.archived_tasks().to_vec()
    }

    /// Returns board counts.
    pub async fn stats(&self) -> BoardStats {
        self.board.lock().await.stats()
    }

    /// Returns the structural representation of the live board.
    pub async fn snapshot(&self) -> BoardSnapshot {
        self.board.lock().await.to_snapshot()
    }

    async fn mutate<F>(
        &self,
        caller: &str,
        action: &'static str,
        apply: F,
    ) -> BoardServiceResult<Task>
    where
        F: FnOnce(&mut Board, UserName, &C) -> Result<Task, BoardDomainError> + Send,
    {
        let user = resolve_caller(caller).inspect_err(|err| {
            warn!(board = %self.id, action, error = %err, "caller rejected");
        })?;

        let mut board = self.board.lock().await;
        let mut draft = board.clone();
        let task = apply(&mut draft, user.clone(), &*self.clock).inspect_err(|err| {
            warn!(board = %self.id, caller = %user, action, error = %err, "request rejected");
        })?;
        self.repository.save(&draft).await?;
        *board = draft;
        drop(board);

        info!(board = %self.id, task = %task.id(), caller = %user, action, "board updated");
        Ok(task)
    }
}

/// A blank identity is treated as anonymous.
fn resolve_caller(caller: &str) -> BoardServiceResult<UserName> {
    if caller.trim().is_empty() {
        return Err(BoardServiceError::AnonymousCaller);
    }
    let user = UserName::new(caller)?;
    if user.is_anonymous() {
        return Err(BoardServiceError::AnonymousCaller);
    }
    Ok(user)
}
