//! Domain model for the what-to-do-next board.
//!
//! Tasks own their lifecycle rules and activity log; the board owns the
//! tasks, orders them by votes and decides which one to hand out next.
//! Persistence and request handling stay outside of the domain boundary.

mod activity;
mod board;
mod error;
mod ids;
mod snapshot;
mod task;

pub use activity::ActivityEntry;
pub use board::{Board, BoardStats};
pub use error::{BoardDomainError, SnapshotError, TaskAction, TaskDomainError};
pub use ids::{BoardId, TaskId, UserName};
pub use snapshot::{BoardSnapshot, TaskSnapshot};
pub use task::{Task, TaskState};
