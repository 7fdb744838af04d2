#![allow(dead_code)]

use async_trait::async_trait;
use quiz_settle::domain::ports::{CasOutcome, RoomStore, Versioned};
use quiz_settle::domain::questions::Question;
use quiz_settle::domain::room::Room;
use quiz_settle::error::Result;
use quiz_settle::infrastructure::in_memory::InMemoryRoomStore;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

pub const ANSWERS: [&str; 10] = ["A", "B", "C", "D", "A", "B", "C", "D", "A", "B"];

pub fn questions() -> Vec<Question> {
    ANSWERS
        .iter()
        .enumerate()
        .map(|(i, answer)| Question {
            question: format!("Question {}", i + 1),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            answer: answer.to_string(),
        })
        .collect()
}

/// A fresh room seating player `A` (Alice) and `B` (Bob).
pub fn room(id: &str) -> Room {
    Room::new(
        id,
        questions(),
        [
            ("A".to_string(), "Alice".to_string()),
            ("B".to_string(), "Bob".to_string()),
        ],
    )
    .expect("valid room")
}

/// Any option other than the right one for `round`.
pub fn wrong_answer(round: u32) -> &'static str {
    if ANSWERS[round as usize] == "D" { "A" } else { "D" }
}

pub async fn seed(store: &dyn RoomStore, room: Room) {
    let room_id = room.room_id.clone();
    let outcome = store
        .compare_and_swap(&room_id, None, Some(room))
        .await
        .expect("seed room");
    assert_eq!(outcome, CasOutcome::Committed);
}

/// Wraps an in-memory store and slips a competing write in before each of
/// the first `interferences` swaps, forcing the caller to retry.
pub struct InterferingStore {
    pub inner: InMemoryRoomStore,
    interferences: AtomicU32,
}

impl InterferingStore {
    pub fn new(inner: InMemoryRoomStore, interferences: u32) -> Self {
        Self {
            inner,
            interferences: AtomicU32::new(interferences),
        }
    }
}

#[async_trait]
impl RoomStore for InterferingStore {
    async fn load(&self, room_id: &str) -> Result<Option<Versioned<Room>>> {
        self.inner.load(room_id).await
    }

    async fn compare_and_swap(
        &self,
        room_id: &str,
        expected: Option<u64>,
        next: Option<Room>,
    ) -> Result<CasOutcome> {
        let interfere = self
            .interferences
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if interfere && let Some(doc) = self.inner.load(room_id).await? {
            self.inner
                .compare_and_swap(room_id, Some(doc.version), Some(doc.value))
                .await?;
        }
        self.inner.compare_and_swap(room_id, expected, next).await
    }
}

/// Writes `rooms` rooms (`room-0`, `room-1`, ...) as a JSON seed file.
pub fn generate_rooms_json(path: &Path, rooms: usize) -> std::result::Result<(), Error> {
    let seeds: Vec<Room> = (0..rooms).map(|i| room(&format!("room-{i}"))).collect();
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), &seeds)?;
    Ok(())
}

/// Writes a complete game for every room: Alice always answers right, Bob
/// always wrong.
pub fn generate_submissions_csv(path: &Path, rooms: usize) -> std::result::Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["room", "round", "player", "chosen"])?;
    for round in 0..10u32 {
        for i in 0..rooms {
            let room_id = format!("room-{i}");
            let round_str = round.to_string();
            wtr.write_record([room_id.as_str(), round_str.as_str(), "B", wrong_answer(round)])?;
            wtr.write_record([room_id.as_str(), round_str.as_str(), "A", ANSWERS[round as usize]])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_lines(path: &Path, lines: &[&str]) -> std::result::Result<(), Error> {
    let mut file = File::create(path)?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    Ok(())
}
