//! JSON documents read by the command line: room seeds and question banks.

use crate::domain::questions::Question;
use crate::domain::room::Room;
use crate::error::Result;
use std::io::Read;

/// Reads a JSON array of rooms and validates each one.
pub fn read_rooms<R: Read>(source: R) -> Result<Vec<Room>> {
    let rooms: Vec<Room> = serde_json::from_reader(source)?;
    for room in &rooms {
        room.validate()?;
    }
    Ok(rooms)
}

/// Reads a JSON array of questions.
pub fn read_question_bank<R: Read>(source: R) -> Result<Vec<Question>> {
    Ok(serde_json::from_reader(source)?)
}
