use serde::{Deserialize, Serialize};

/// Entries kept per game.
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub name: String,
    pub score: u32,
}

impl RankEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Inserts `entry` into a leaderboard sorted by descending score.
///
/// A new score is placed ahead of existing equal scores. The result never
/// holds more than [`LEADERBOARD_SIZE`] entries.
pub fn insert_ranked(mut ranks: Vec<RankEntry>, entry: RankEntry) -> Vec<RankEntry> {
    match ranks.iter().position(|r| entry.score >= r.score) {
        Some(idx) => ranks.insert(idx, entry),
        None if ranks.len() < LEADERBOARD_SIZE => ranks.push(entry),
        None => {}
    }
    ranks.truncate(LEADERBOARD_SIZE);
    ranks
}
