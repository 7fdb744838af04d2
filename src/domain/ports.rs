use super::leaderboard::RankEntry;
use super::room::Room;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A stored document together with its write version.
///
/// The version starts at 1 when the document is created and grows by one on
/// every committed write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

/// Outcome of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    Committed,
    /// The stored version did not match the expected one; nothing was written.
    Conflict,
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn load(&self, room_id: &str) -> Result<Option<Versioned<Room>>>;

    /// Writes `next` only if the stored version still equals `expected`.
    ///
    /// `expected = None` requires the room to be absent. `next = None`
    /// deletes the room.
    async fn compare_and_swap(
        &self,
        room_id: &str,
        expected: Option<u64>,
        next: Option<Room>,
    ) -> Result<CasOutcome>;
}

#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    async fn get(&self, game: &str) -> Result<Vec<RankEntry>>;
    async fn put(&self, game: &str, ranks: Vec<RankEntry>) -> Result<()>;
}

pub type RoomStoreRef = Arc<dyn RoomStore>;
pub type LeaderboardStoreBox = Box<dyn LeaderboardStore>;
