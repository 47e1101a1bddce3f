//! wtdn: a shared "what to do next" board.
//!
//! A small group of identified users contributes tasks, votes for them,
//! claims the most-voted open task and marks work as completed. This crate
//! provides the task lifecycle rules, the board-level assignment policy, and
//! the persistence and configuration plumbing around them.
//!
//! # Architecture
//!
//! The board follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (memory, JSON files)
//! - **Services**: Request handling that serialises access to a board
//!
//! # Modules
//!
//! - [`board`]: Tasks, the board, and their persistence
//! - [`config`]: Layered configuration for the `wtdn` binary

pub mod board;
pub mod config;
