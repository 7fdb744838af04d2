use super::room::{PlayerId, RoomId};
use serde::{Deserialize, Serialize};

/// One player's answer for one round of one room.
///
/// This is the payload of the event that triggers settlement. `round` is the
/// round the client answered; settlement verifies it against the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub room: RoomId,
    pub round: u32,
    pub player: PlayerId,
    pub chosen: String,
}

impl Submission {
    pub fn new(
        room: impl Into<RoomId>,
        round: u32,
        player: impl Into<PlayerId>,
        chosen: impl Into<String>,
    ) -> Self {
        Self {
            room: room.into(),
            round,
            player: player.into(),
            chosen: chosen.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_deserialization() {
        let csv = "room, round, player, chosen\nroom-1, 0, A, B";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let mut iter = reader.deserialize();

        let result: Submission = iter
            .next()
            .unwrap()
            .expect("Failed to deserialize submission");

        assert_eq!(result, Submission::new("room-1", 0, "A", "B"));
    }
}
