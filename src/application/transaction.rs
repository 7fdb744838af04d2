use crate::domain::ports::{CasOutcome, RoomStore};
use crate::domain::room::Room;
use crate::error::{QuizError, Result};
use tracing::debug;

/// What a transaction body decided for the snapshot it was given.
#[derive(Debug)]
pub enum TxStep<T> {
    /// Write `Room` back if nobody changed the document since it was read.
    Commit(Room, T),
    /// Leave the document as it is.
    Abort(T),
}

#[derive(Debug)]
pub struct TxReport<T> {
    pub value: T,
    pub committed: bool,
    /// Number of times the body ran, including the final one.
    pub attempts: u32,
}

/// Runs `body` as an optimistic read-modify-write on one room document.
///
/// Every attempt reads the latest version, hands the room (or `None` if it
/// does not exist) to `body`, and writes the result with a compare-and-swap.
/// A conflicting concurrent write discards the attempt and `body` is run
/// again against the fresh document, so `body` must be a pure function of
/// its input. An `Err` from `body` aborts without writing.
///
/// Gives up with [`QuizError::Contention`] after `max_attempts` conflicts.
pub async fn run_transaction<T, F>(
    store: &dyn RoomStore,
    room_id: &str,
    max_attempts: u32,
    mut body: F,
) -> Result<TxReport<T>>
where
    F: FnMut(Option<Room>) -> Result<TxStep<T>> + Send,
    T: Send,
{
    let max_attempts = max_attempts.max(1);
    for attempt in 1..=max_attempts {
        let (expected, snapshot) = match store.load(room_id).await? {
            Some(doc) => (Some(doc.version), Some(doc.value)),
            None => (None, None),
        };

        match body(snapshot)? {
            TxStep::Abort(value) => {
                return Ok(TxReport {
                    value,
                    committed: false,
                    attempts: attempt,
                });
            }
            TxStep::Commit(next, value) => {
                match store.compare_and_swap(room_id, expected, Some(next)).await? {
                    CasOutcome::Committed => {
                        return Ok(TxReport {
                            value,
                            committed: true,
                            attempts: attempt,
                        });
                    }
                    CasOutcome::Conflict => {
                        debug!(room_id, attempt, "Room changed during transaction, retrying");
                        tokio::task::yield_now().await;
                    }
                }
            }
        }
    }

    Err(QuizError::Contention {
        room_id: room_id.to_string(),
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::questions::Question;
    use crate::infrastructure::in_memory::InMemoryRoomStore;

    fn room() -> Room {
        let questions = (0..10)
            .map(|i| Question {
                question: format!("q{i}"),
                options: vec![],
                answer: "A".into(),
            })
            .collect();
        Room::new(
            "r1",
            questions,
            [("A".to_string(), "a".to_string()), ("B".to_string(), "b".to_string())],
        )
        .unwrap()
    }

    async fn seeded() -> InMemoryRoomStore {
        let store = InMemoryRoomStore::new();
        store.compare_and_swap("r1", None, Some(room())).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_commit_first_attempt() {
        let store = seeded().await;
        let report = run_transaction(&store, "r1", 5, |current| {
            let mut room = current.unwrap();
            room.round += 1;
            Ok(TxStep::Commit(room, ()))
        })
        .await
        .unwrap();

        assert!(report.committed);
        assert_eq!(report.attempts, 1);
        assert_eq!(store.load("r1").await.unwrap().unwrap().value.round, 1);
    }

    #[tokio::test]
    async fn test_abort_does_not_write() {
        let store = seeded().await;
        let report = run_transaction(&store, "missing", 5, |current| {
            assert!(current.is_none());
            Ok(TxStep::Abort("absent"))
        })
        .await
        .unwrap();

        assert!(!report.committed);
        assert_eq!(report.value, "absent");
        assert_eq!(store.load("r1").await.unwrap().unwrap().version, 1);
    }

    #[tokio::test]
    async fn test_body_error_aborts() {
        let store = seeded().await;
        let result: Result<TxReport<()>> = run_transaction(&store, "r1", 5, |_| {
            Err(QuizError::ValidationError("nope".into()))
        })
        .await;

        assert!(matches!(result, Err(QuizError::ValidationError(_))));
        assert_eq!(store.load("r1").await.unwrap().unwrap().version, 1);
    }
}
