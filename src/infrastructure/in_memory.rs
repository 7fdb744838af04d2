use crate::domain::leaderboard::RankEntry;
use crate::domain::ports::{CasOutcome, LeaderboardStore, RoomStore, Versioned};
use crate::domain::room::{Room, RoomId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for room documents.
///
/// The version check and the write of `compare_and_swap` happen under a
/// single write guard, so concurrent swaps against the same version cannot
/// both commit.
#[derive(Default, Clone)]
pub struct InMemoryRoomStore {
    rooms: Arc<RwLock<HashMap<RoomId, Versioned<Room>>>>,
}

impl InMemoryRoomStore {
    /// Creates a new, empty in-memory room store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn load(&self, room_id: &str) -> Result<Option<Versioned<Room>>> {
        let rooms = self.rooms.read().await;
        Ok(rooms.get(room_id).cloned())
    }

    async fn compare_and_swap(
        &self,
        room_id: &str,
        expected: Option<u64>,
        next: Option<Room>,
    ) -> Result<CasOutcome> {
        let mut rooms = self.rooms.write().await;
        let current = rooms.get(room_id).map(|doc| doc.version);
        if current != expected {
            return Ok(CasOutcome::Conflict);
        }

        match next {
            Some(room) => {
                let version = current.map_or(1, |v| v + 1);
                rooms.insert(room_id.to_string(), Versioned { version, value: room });
            }
            None => {
                rooms.remove(room_id);
            }
        }
        Ok(CasOutcome::Committed)
    }
}

/// A thread-safe in-memory store for per-game leaderboards.
#[derive(Default, Clone)]
pub struct InMemoryLeaderboardStore {
    boards: Arc<RwLock<HashMap<String, Vec<RankEntry>>>>,
}

impl InMemoryLeaderboardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaderboardStore for InMemoryLeaderboardStore {
    async fn get(&self, game: &str) -> Result<Vec<RankEntry>> {
        let boards = self.boards.read().await;
        Ok(boards.get(game).cloned().unwrap_or_default())
    }

    async fn put(&self, game: &str, ranks: Vec<RankEntry>) -> Result<()> {
        let mut boards = self.boards.write().await;
        boards.insert(game.to_string(), ranks);
        Ok(())
    }
}
