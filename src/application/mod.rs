//! Application layer: the settlement engine and the services around it.
//!
//! All room mutation goes through [`transaction::run_transaction`], an
//! optimistic read-modify-write over the [`RoomStore`](crate::domain::ports::RoomStore)
//! port. Nothing here keeps room state between calls.

pub mod engine;
pub mod leaderboard;
pub mod rooms;
pub mod submission;
pub mod transaction;
