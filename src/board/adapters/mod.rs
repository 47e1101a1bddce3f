//! Adapter implementations for the board repository port.

pub mod file;
pub mod memory;
