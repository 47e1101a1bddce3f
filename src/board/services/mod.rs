//! Application services that serialise requests against one board.

mod lifecycle;

pub use lifecycle::{BoardService, BoardServiceError, BoardServiceResult};
