//! In-memory board repository for tests and ephemeral boards.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{Board, BoardId, BoardSnapshot},
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};

/// Thread-safe in-memory board repository.
///
/// Boards are kept as snapshots so that every load goes through the same
/// validation as a load from durable storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    state: Arc<RwLock<HashMap<BoardId, BoardSnapshot>>>,
}

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with a stored snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: BoardSnapshot) -> Self {
        let boards = HashMap::from([(snapshot.id.clone(), snapshot)]);
        Self {
            state: Arc::new(RwLock::new(boards)),
        }
    }

    /// Returns the stored snapshot for `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] if the lock is poisoned.
    pub fn stored(&self, id: &BoardId) -> BoardRepositoryResult<Option<BoardSnapshot>> {
        let state = self.state.read().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(id).cloned())
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn load(&self, id: &BoardId) -> BoardRepositoryResult<Option<Board>> {
        self.stored(id)?
            .map(Board::from_snapshot)
            .transpose()
            .map_err(BoardRepositoryError::from)
    }

    async fn save(&self, board: &Board) -> BoardRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.insert(board.id().clone(), board.to_snapshot());
        Ok(())
    }
}
