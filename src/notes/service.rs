//! NoteService — note lifecycle and the locking state machine.
//!
//! A note starts unlocked and can transition to locked exactly once; there is
//! no unlock. While locked, the record cannot be updated or deleted and its
//! fields stay untouched. The rule lives here so it applies uniformly to
//! update, lock, and delete; the store's conditional writes
//! (`... WHERE uuid = ? AND locked = 0`) close the fetch-then-check race.

use std::sync::Arc;

use crate::db::Database;
use crate::models::{NoteDetail, NoteSummary};

use super::NoteError;

#[derive(Clone)]
pub struct NoteService {
    db: Arc<Database>,
}

impl NoteService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a note. Always lands unlocked.
    pub fn create(&self, name: &str, description: Option<&str>) -> Result<NoteDetail, NoteError> {
        let note = self.db.insert_note(name, description)?;
        log::info!("[NOTES] Created note {}", note.uuid);
        Ok(note.into())
    }

    /// List all notes in creation order. Read-only.
    pub fn list(&self) -> Result<Vec<NoteSummary>, NoteError> {
        let notes = self.db.list_notes()?;
        Ok(notes.into_iter().map(Into::into).collect())
    }

    /// Fetch a single note by uuid.
    pub fn get(&self, uuid: &str) -> Result<NoteDetail, NoteError> {
        let note = self
            .db
            .find_note_by_uuid(uuid)?
            .ok_or(NoteError::NotFound)?;
        Ok(note.into())
    }

    /// Partial update of name and/or description; omitted fields keep their
    /// previous value. Rejected wholesale once the note is locked.
    pub fn update(
        &self,
        uuid: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<NoteDetail, NoteError> {
        let note = self
            .db
            .find_note_by_uuid(uuid)?
            .ok_or(NoteError::NotFound)?;
        if note.locked {
            return Err(NoteError::Locked);
        }

        // The store predicate re-checks the flag, so a lock that lands
        // between our fetch and this write still surfaces as a conflict.
        if !self.db.update_note_fields(uuid, name, description)? {
            return Err(NoteError::Locked);
        }

        let refreshed = self
            .db
            .find_note_by_uuid(uuid)?
            .ok_or(NoteError::NotFound)?;
        Ok(refreshed.into())
    }

    /// One-way transition unlocked → locked. A second lock call is rejected,
    /// not silently accepted.
    pub fn lock(&self, uuid: &str) -> Result<NoteDetail, NoteError> {
        let note = self
            .db
            .find_note_by_uuid(uuid)?
            .ok_or(NoteError::NotFound)?;
        if note.locked {
            return Err(NoteError::AlreadyLocked);
        }

        if !self.db.set_note_locked(uuid)? {
            return Err(NoteError::AlreadyLocked);
        }

        log::info!("[NOTES] Locked note {}", uuid);
        let refreshed = self
            .db
            .find_note_by_uuid(uuid)?
            .ok_or(NoteError::NotFound)?;
        Ok(refreshed.into())
    }

    /// Remove an unlocked note. Locked notes cannot be deleted.
    pub fn delete(&self, uuid: &str) -> Result<(), NoteError> {
        let note = self
            .db
            .find_note_by_uuid(uuid)?
            .ok_or(NoteError::NotFound)?;
        if note.locked {
            return Err(NoteError::Locked);
        }

        if !self.db.delete_note(uuid)? {
            return Err(NoteError::Locked);
        }

        log::info!("[NOTES] Deleted note {}", uuid);
        Ok(())
    }
}
