use serde::{Deserialize, Serialize};

/// A note row as stored. The internal `id` is assigned by SQLite, orders
/// listings, and is never exposed over the wire; `uuid` is the only
/// identifier external callers see.
#[derive(Debug, Clone)]
pub struct Note {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub description: Option<String>,
    pub locked: bool,
}

/// Full note view returned by create/get/update/lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDetail {
    pub uuid: String,
    pub name: String,
    pub description: Option<String>,
    pub locked: bool,
}

/// Listing view: external key and name only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub uuid: String,
    pub name: String,
}

impl From<Note> for NoteDetail {
    fn from(note: Note) -> Self {
        Self {
            uuid: note.uuid,
            name: note.name,
            description: note.description,
            locked: note.locked,
        }
    }
}

impl From<Note> for NoteSummary {
    fn from(note: Note) -> Self {
        Self {
            uuid: note.uuid,
            name: note.name,
        }
    }
}
