use super::questions::Question;
use crate::config::EndMessages;
use crate::error::QuizError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

pub type RoomId = String;
pub type PlayerId = String;

/// Rounds in a match. `round == TOTAL_ROUNDS` is the terminal value.
pub const TOTAL_ROUNDS: u32 = 10;
/// Players seated in every room.
pub const PLAYERS_PER_ROOM: usize = 2;
/// Score awarded for a correct answer.
pub const SCORE_AWARD: u32 = 100;

/// Room document shapes that settlement refuses to touch.
///
/// Any of these means an upstream data-integrity bug; the transaction aborts
/// and nothing is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettleError {
    #[error("player {0} is not seated in the room")]
    UnknownPlayer(PlayerId),
    #[error("no recorded submission for player {player} in round {round}")]
    MissingSubmission { round: u32, player: PlayerId },
    #[error("submission targets round {got} but the room is at round {expected}")]
    RoundMismatch { expected: u32, got: u32 },
    #[error("round {0} has no question")]
    NoQuestion(u32),
    #[error("room has {0} players, expected 2")]
    PlayerCount(usize),
    #[error("the match is over")]
    GameOver,
    #[error("score of player {0} would overflow")]
    ScoreOverflow(PlayerId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub user_name: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub combo: u32,
}

impl Player {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            score: 0,
            combo: 0,
        }
    }

    /// Leaves the player untouched when the award would overflow.
    fn apply_answer(&mut self, id: &str, correct: bool) -> Result<(), SettleError> {
        if !correct {
            self.combo = 0;
            return Ok(());
        }
        match (self.score.checked_add(SCORE_AWARD), self.combo.checked_add(1)) {
            (Some(score), Some(combo)) => {
                self.score = score;
                self.combo = combo;
                Ok(())
            }
            _ => Err(SettleError::ScoreOverflow(id.to_string())),
        }
    }
}

/// A player's recorded answer for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenEntry {
    pub chosen: String,
    #[serde(default)]
    pub judged: bool,
}

/// Result of judging one submission against the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Judgement {
    /// The entry was judged by an earlier settlement; nothing changed.
    AlreadyJudged,
    Scored(Scoring),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoring {
    /// The round that was settled (value of `round` before any advance).
    pub round: u32,
    pub correct: bool,
    pub round_advanced: bool,
    pub end_message: Option<String>,
}

/// Shared state of a single two-player match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub room_id: RoomId,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub round: u32,
    pub players: BTreeMap<PlayerId, Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_message: Option<String>,
    #[serde(default)]
    pub player_chosen: BTreeMap<u32, BTreeMap<PlayerId, ChosenEntry>>,
}

impl Room {
    /// Builds a fresh room at round 0 with zero scores.
    pub fn new(
        room_id: impl Into<RoomId>,
        questions: Vec<Question>,
        players: impl IntoIterator<Item = (PlayerId, String)>,
    ) -> Result<Self, QuizError> {
        let mut seated = BTreeMap::new();
        for (id, name) in players {
            if seated.insert(id.clone(), Player::new(name)).is_some() {
                return Err(QuizError::ValidationError(format!(
                    "Duplicate player id {}",
                    id
                )));
            }
        }

        let room = Self {
            room_id: room_id.into(),
            questions,
            round: 0,
            players: seated,
            end_message: None,
            player_chosen: BTreeMap::new(),
        };
        room.validate()?;
        Ok(room)
    }

    /// Checks the shape every room must have at creation time.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.room_id.is_empty() {
            return Err(QuizError::ValidationError(
                "Room id must not be empty".to_string(),
            ));
        }
        if self.questions.len() != TOTAL_ROUNDS as usize {
            return Err(QuizError::ValidationError(format!(
                "Room {} has {} questions, expected {}",
                self.room_id,
                self.questions.len(),
                TOTAL_ROUNDS
            )));
        }
        if self.players.len() != PLAYERS_PER_ROOM {
            return Err(QuizError::ValidationError(format!(
                "Room {} has {} players, expected {}",
                self.room_id,
                self.players.len(),
                PLAYERS_PER_ROOM
            )));
        }
        if self.round > TOTAL_ROUNDS {
            return Err(QuizError::ValidationError(format!(
                "Room {} is at round {}, past the last round",
                self.room_id, self.round
            )));
        }
        Ok(())
    }

    pub fn is_over(&self) -> bool {
        self.round >= TOTAL_ROUNDS
    }

    pub fn entry(&self, round: u32, player: &str) -> Option<&ChosenEntry> {
        self.player_chosen.get(&round)?.get(player)
    }

    /// Records a player's answer for `round_index` with `judged = false`.
    ///
    /// Returns `Ok(false)` when the player already has an entry for that
    /// round; the first write wins and the room is left untouched. A finished
    /// match accepts no new entries.
    pub fn record_submission(
        &mut self,
        round_index: u32,
        player: &str,
        chosen: &str,
    ) -> Result<bool, SettleError> {
        if !self.players.contains_key(player) {
            return Err(SettleError::UnknownPlayer(player.to_string()));
        }
        if self.entry(round_index, player).is_some() {
            return Ok(false);
        }
        if self.is_over() {
            return Err(SettleError::GameOver);
        }
        if round_index != self.round {
            return Err(SettleError::RoundMismatch {
                expected: self.round,
                got: round_index,
            });
        }

        self.player_chosen.entry(round_index).or_default().insert(
            player.to_string(),
            ChosenEntry {
                chosen: chosen.to_string(),
                judged: false,
            },
        );
        Ok(true)
    }

    /// Scores one submission and advances the round when both players of
    /// the current round are judged.
    ///
    /// The completion check runs after this call has marked its own entry,
    /// so within a serialized read-modify-write exactly one of the two
    /// settlements of a round observes completion.
    pub fn settle(
        &mut self,
        round_index: u32,
        player: &str,
        chosen: &str,
        messages: &EndMessages,
    ) -> Result<Judgement, SettleError> {
        if self.entry(round_index, player).is_some_and(|e| e.judged) {
            return Ok(Judgement::AlreadyJudged);
        }
        if self.players.len() != PLAYERS_PER_ROOM {
            return Err(SettleError::PlayerCount(self.players.len()));
        }
        if self.is_over() {
            return Err(SettleError::GameOver);
        }
        let round = self.round;
        if round_index != round {
            return Err(SettleError::RoundMismatch {
                expected: round,
                got: round_index,
            });
        }
        let question = self
            .questions
            .get(round as usize)
            .ok_or(SettleError::NoQuestion(round))?;
        let correct = question.is_correct(chosen);

        let entry = self
            .player_chosen
            .get_mut(&round)
            .and_then(|entries| entries.get_mut(player))
            .ok_or_else(|| SettleError::MissingSubmission {
                round,
                player: player.to_string(),
            })?;
        let seat = self
            .players
            .get_mut(player)
            .ok_or_else(|| SettleError::UnknownPlayer(player.to_string()))?;

        seat.apply_answer(player, correct)?;
        entry.judged = true;

        let mut end_message = None;
        let round_advanced = self.round_complete(round);
        if round_advanced {
            if round == TOTAL_ROUNDS - 1 {
                let message = self.final_standing(messages);
                self.end_message = Some(message.clone());
                end_message = Some(message);
            }
            // Incremented on the last round too; clients read 10 as game over.
            self.round += 1;
        }

        Ok(Judgement::Scored(Scoring {
            round,
            correct,
            round_advanced,
            end_message,
        }))
    }

    fn round_complete(&self, round: u32) -> bool {
        let Some(entries) = self.player_chosen.get(&round) else {
            return false;
        };
        self.players
            .keys()
            .all(|id| entries.get(id).is_some_and(|e| e.judged))
    }

    fn final_standing(&self, messages: &EndMessages) -> String {
        let mut seats = self.players.values();
        match (seats.next(), seats.next()) {
            (Some(a), Some(b)) => match a.score.cmp(&b.score) {
                Ordering::Greater => messages.win(&a.user_name),
                Ordering::Less => messages.win(&b.user_name),
                Ordering::Equal => messages.draw.clone(),
            },
            _ => messages.draw.clone(),
        }
    }
}
