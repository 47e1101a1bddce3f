//! File-system adapters.

mod board;

pub use board::FileBoardRepository;
