use crate::domain::ports::{CasOutcome, RoomStore};
use crate::domain::room::Room;
use crate::error::{QuizError, Result};
use tracing::info;

/// Stores a new room. Fails if a room with the same id already exists.
pub async fn create_room(store: &dyn RoomStore, room: Room) -> Result<()> {
    room.validate()?;
    let room_id = room.room_id.clone();
    match store.compare_and_swap(&room_id, None, Some(room)).await? {
        CasOutcome::Committed => {
            info!(room_id = %room_id, "Room created");
            Ok(())
        }
        CasOutcome::Conflict => Err(QuizError::ValidationError(format!(
            "Room {} already exists",
            room_id
        ))),
    }
}

pub async fn load_room(store: &dyn RoomStore, room_id: &str) -> Result<Option<Room>> {
    Ok(store.load(room_id).await?.map(|doc| doc.value))
}

/// Removes a room whatever its current version. Returns `false` if it was
/// already gone.
pub async fn delete_room(store: &dyn RoomStore, room_id: &str) -> Result<bool> {
    loop {
        let Some(doc) = store.load(room_id).await? else {
            return Ok(false);
        };
        if store.compare_and_swap(room_id, Some(doc.version), None).await? == CasOutcome::Committed
        {
            info!(room_id, "Room deleted");
            return Ok(true);
        }
    }
}
