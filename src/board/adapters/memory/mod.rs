//! In-memory adapters.

mod board;

pub use board::InMemoryBoardRepository;
