//! Repository port for saving and restoring whole boards.

use crate::board::domain::{Board, BoardId, SnapshotError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board repository operations.
pub type BoardRepositoryResult<T> = Result<T, BoardRepositoryError>;

/// Board persistence contract.
///
/// A board is stored as one document keyed by its [`BoardId`]; every save
/// replaces the previous document.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Loads the board with the given identifier.
    ///
    /// Returns `None` when nothing has been saved under the identifier yet.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Snapshot`] when the stored document
    /// violates a board invariant, or
    /// [`BoardRepositoryError::Persistence`] when it cannot be read.
    async fn load(&self, id: &BoardId) -> BoardRepositoryResult<Option<Board>>;

    /// Saves the board, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the document
    /// cannot be written.
    async fn save(&self, board: &Board) -> BoardRepositoryResult<()>;
}

/// Errors returned by board repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardRepositoryError {
    /// The stored document does not describe a valid board.
    #[error("stored board is invalid: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardRepositoryError {
    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
