//! JSON document store for boards inside a capability-scoped directory.
//!
//! Each board lives in `<root>/<board-id>.json`. Saves write a sibling
//! `.tmp` file and rename it over the document, so a reader never observes
//! a half-written board.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

use crate::board::{
    domain::{Board, BoardId, BoardSnapshot},
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};

/// Board repository backed by JSON files.
#[derive(Debug, Clone)]
pub struct FileBoardRepository {
    dir: Arc<Dir>,
}

impl FileBoardRepository {
    /// Opens the storage directory, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(root: &Utf8Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }

    /// Returns the document name used for a board.
    #[must_use]
    pub fn document_name(id: &BoardId) -> String {
        format!("{id}.json")
    }
}

fn read_document(dir: &Dir, name: &str) -> io::Result<Option<String>> {
    match dir.read_to_string(name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

fn replace_document(dir: &Dir, name: &str, contents: &[u8]) -> io::Result<()> {
    let staging = format!("{name}.tmp");
    dir.write(&staging, contents)?;
    dir.rename(&staging, dir, name)
}

#[async_trait]
impl BoardRepository for FileBoardRepository {
    async fn load(&self, id: &BoardId) -> BoardRepositoryResult<Option<Board>> {
        let dir = Arc::clone(&self.dir);
        let name = Self::document_name(id);
        let contents = tokio::task::spawn_blocking(move || read_document(&dir, &name))
            .await
            .map_err(BoardRepositoryError::persistence)?
            .map_err(BoardRepositoryError::persistence)?;

        let Some(contents) = contents else {
            return Ok(None);
        };
        let snapshot: BoardSnapshot =
            serde_json::from_str(&contents).map_err(BoardRepositoryError::persistence)?;
        if snapshot.id != *id {
            return Err(BoardRepositoryError::persistence(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("document for board {id} holds board {}", snapshot.id),
            )));
        }
        Ok(Some(Board::from_snapshot(snapshot)?))
    }

    async fn save(&self, board: &Board) -> BoardRepositoryResult<()> {
        let contents = serde_json::to_vec_pretty(&board.to_snapshot())
            .map_err(BoardRepositoryError::persistence)?;
        let dir = Arc::clone(&self.dir);
        let name = Self::document_name(board.id());
        tokio::task::spawn_blocking(move || replace_document(&dir, &name, &contents))
            .await
            .map_err(BoardRepositoryError::persistence)?
            .map_err(BoardRepositoryError::persistence)
    }
}
