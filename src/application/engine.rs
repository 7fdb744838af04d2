use super::transaction::{TxStep, run_transaction};
use crate::config::SettlementConfig;
use crate::domain::ports::RoomStoreRef;
use crate::domain::room::{Judgement, PlayerId};
use crate::domain::submission::Submission;
use crate::error::{QuizError, Result};
use tracing::{error, info, warn};

/// What a single settlement did to the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The room no longer exists; nothing was written.
    RoomAbsent,
    /// This player's answer for the round was already scored; nothing was written.
    AlreadyJudged,
    Settled {
        round: u32,
        player: PlayerId,
        correct: bool,
        round_advanced: bool,
        end_message: Option<String>,
        attempts: u32,
    },
}

/// Scores answer submissions and advances rounds.
///
/// The engine holds no room state of its own. Every call is one optimistic
/// transaction against the store, which makes concurrent calls for the same
/// room safe without any locking here.
pub struct SettlementEngine {
    store: RoomStoreRef,
    config: SettlementConfig,
}

impl SettlementEngine {
    pub fn new(store: RoomStoreRef, config: SettlementConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &RoomStoreRef {
        &self.store
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Settles one recorded submission.
    ///
    /// The submission must already be recorded in the room's `playerChosen`.
    /// Commits at most one write. An invariant violation aborts the
    /// transaction and is returned as [`QuizError::InvariantViolation`].
    pub async fn settle_answer(&self, submission: &Submission) -> Result<SettleOutcome> {
        let messages = &self.config.messages;
        let result = run_transaction(
            self.store.as_ref(),
            &submission.room,
            self.config.max_attempts,
            |current| {
                let Some(mut room) = current else {
                    return Ok(TxStep::Abort(None));
                };
                let judgement = room
                    .settle(
                        submission.round,
                        &submission.player,
                        &submission.chosen,
                        messages,
                    )
                    .map_err(|source| QuizError::InvariantViolation {
                        room_id: submission.room.clone(),
                        source,
                    })?;

                match judgement {
                    Judgement::AlreadyJudged => Ok(TxStep::Abort(Some(judgement))),
                    Judgement::Scored(_) => Ok(TxStep::Commit(room, Some(judgement))),
                }
            },
        )
        .await;

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                error!(
                    room_id = %submission.room,
                    round = submission.round,
                    player = %submission.player,
                    error = %e,
                    "Settlement failed"
                );
                return Err(e);
            }
        };

        let outcome = match report.value {
            None => SettleOutcome::RoomAbsent,
            Some(Judgement::AlreadyJudged) => SettleOutcome::AlreadyJudged,
            Some(Judgement::Scored(scoring)) => SettleOutcome::Settled {
                round: scoring.round,
                player: submission.player.clone(),
                correct: scoring.correct,
                round_advanced: scoring.round_advanced,
                end_message: scoring.end_message,
                attempts: report.attempts,
            },
        };

        match &outcome {
            SettleOutcome::RoomAbsent => {
                warn!(room_id = %submission.room, "Room gone before settlement, skipping");
            }
            SettleOutcome::AlreadyJudged => {
                info!(
                    room_id = %submission.room,
                    round = submission.round,
                    player = %submission.player,
                    "Answer already judged"
                );
            }
            SettleOutcome::Settled {
                round,
                correct,
                round_advanced,
                end_message,
                attempts,
                ..
            } => {
                info!(
                    room_id = %submission.room,
                    round,
                    player = %submission.player,
                    correct,
                    round_advanced,
                    attempts,
                    "Answer settled"
                );
                if let Some(message) = end_message {
                    info!(room_id = %submission.room, end_message = %message, "Game over");
                }
            }
        }

        Ok(outcome)
    }
}
