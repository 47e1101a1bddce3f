//! The what-to-do-next board.
//!
//! Users add tasks, vote for the ones they care about, claim the most-voted
//! open task and mark work as completed. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Request handling in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
