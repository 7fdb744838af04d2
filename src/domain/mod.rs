//! Domain types and the pure rules of a quiz match.
//!
//! Nothing in here performs I/O; storage is reached through the traits in
//! [`ports`].

pub mod leaderboard;
pub mod ports;
pub mod questions;
pub mod room;
pub mod submission;
