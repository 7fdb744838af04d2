use super::engine::{SettleOutcome, SettlementEngine};
use super::transaction::{TxStep, run_transaction};
use crate::domain::room::SettleError;
use crate::domain::submission::Submission;
use crate::error::{QuizError, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Result of handing a player's answer to the submission path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No such room; nothing recorded, settlement not triggered.
    RoomAbsent,
    /// The player already answered this round; nothing recorded, settlement
    /// not triggered.
    Duplicate,
    /// The match is already over; nothing recorded, settlement not triggered.
    GameOver,
    /// Recorded and handed to the engine.
    Settled(SettleOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recorded {
    New,
    Duplicate,
    GameOver,
    RoomAbsent,
}

/// Records answers in the room document and triggers settlement for each
/// newly recorded one.
///
/// Recording is its own atomic write, separate from settlement, exactly as
/// a client write into `playerChosen` would be. Cloning is cheap; clones
/// share the engine.
#[derive(Clone)]
pub struct SubmissionPipeline {
    engine: Arc<SettlementEngine>,
}

impl SubmissionPipeline {
    pub fn new(engine: Arc<SettlementEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<SettlementEngine> {
        &self.engine
    }

    /// Records the submission, then settles it if the record is new.
    pub async fn submit(&self, submission: Submission) -> Result<SubmitOutcome> {
        match self.record(&submission).await? {
            Recorded::RoomAbsent => {
                warn!(room_id = %submission.room, "Submission for unknown room dropped");
                Ok(SubmitOutcome::RoomAbsent)
            }
            Recorded::Duplicate => {
                info!(
                    room_id = %submission.room,
                    round = submission.round,
                    player = %submission.player,
                    "Duplicate submission ignored"
                );
                Ok(SubmitOutcome::Duplicate)
            }
            Recorded::GameOver => {
                warn!(
                    room_id = %submission.room,
                    round = submission.round,
                    player = %submission.player,
                    "Submission after the match ended dropped"
                );
                Ok(SubmitOutcome::GameOver)
            }
            Recorded::New => {
                let outcome = self.engine.settle_answer(&submission).await?;
                Ok(SubmitOutcome::Settled(outcome))
            }
        }
    }

    /// Runs [`submit`](Self::submit) on its own task, the way an independent
    /// trigger handler would.
    pub fn dispatch(&self, submission: Submission) -> JoinHandle<Result<SubmitOutcome>> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.submit(submission).await })
    }

    async fn record(&self, submission: &Submission) -> Result<Recorded> {
        let report = run_transaction(
            self.engine.store().as_ref(),
            &submission.room,
            self.engine.config().max_attempts,
            |current| {
                let Some(mut room) = current else {
                    return Ok(TxStep::Abort(Recorded::RoomAbsent));
                };
                match room.record_submission(
                    submission.round,
                    &submission.player,
                    &submission.chosen,
                ) {
                    Ok(true) => Ok(TxStep::Commit(room, Recorded::New)),
                    Ok(false) => Ok(TxStep::Abort(Recorded::Duplicate)),
                    Err(SettleError::GameOver) => Ok(TxStep::Abort(Recorded::GameOver)),
                    Err(source) => Err(QuizError::InvariantViolation {
                        room_id: submission.room.clone(),
                        source,
                    }),
                }
            },
        )
        .await?;

        if report.committed {
            debug!(
                room_id = %submission.room,
                round = submission.round,
                player = %submission.player,
                attempts = report.attempts,
                "Submission recorded"
            );
        }
        Ok(report.value)
    }
}
