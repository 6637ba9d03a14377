use serde::{Deserialize, Serialize};

use super::Reader;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRoom {
    pub id: i64,
    pub number: i32,
    pub name: String,
    pub capacity: i32,
}

impl ReadingRoom {
    pub fn label(&self) -> String {
        format!("{} (#{})", self.name, self.number)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReadingRoom {
    pub number: i32,
    pub name: String,
    pub capacity: i32,
}

/// Readers assigned to one room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomReaders {
    pub room: String,
    #[serde(default)]
    pub readers: Vec<Reader>,
}
