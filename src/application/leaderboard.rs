use crate::domain::leaderboard::{RankEntry, insert_ranked};
use crate::domain::ports::LeaderboardStoreBox;
use crate::error::Result;
use tracing::info;

/// Per-game high-score lists.
///
/// Writes are last-writer-wins; a leaderboard has a single writer per
/// request and nothing here races with room settlement.
pub struct LeaderboardService {
    store: LeaderboardStoreBox,
}

impl LeaderboardService {
    pub fn new(store: LeaderboardStoreBox) -> Self {
        Self { store }
    }

    pub async fn ranks(&self, game: &str) -> Result<Vec<RankEntry>> {
        self.store.get(game).await
    }

    /// Adds a score and returns the updated top list.
    pub async fn submit(&self, game: &str, name: &str, score: u32) -> Result<Vec<RankEntry>> {
        let current = self.store.get(game).await?;
        let ranks = insert_ranked(current, RankEntry::new(name, score));
        self.store.put(game, ranks.clone()).await?;
        info!(game, name, score, "Score submitted");
        Ok(ranks)
    }
}
