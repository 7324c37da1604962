//! Note table operations
//!
//! All mutations are single SQL statements. The `AND locked = 0` predicates
//! on update/lock/delete make each write a one-statement read-check-write:
//! two racing lock calls cannot both match the unlocked row.

use rusqlite::{OptionalExtension, Result as SqliteResult};
use uuid::Uuid;

use super::super::Database;
use crate::models::Note;

impl Database {
    /// Insert a new note with a fresh uuid. New notes are always unlocked.
    pub fn insert_note(&self, name: &str, description: Option<&str>) -> SqliteResult<Note> {
        let conn = self.conn.lock().unwrap();
        let uuid = Uuid::new_v4().to_string();

        conn.execute(
            "INSERT INTO notes (uuid, name, description, locked) VALUES (?1, ?2, ?3, 0)",
            rusqlite::params![&uuid, name, description],
        )?;

        let id = conn.last_insert_rowid();

        Ok(Note {
            id,
            uuid,
            name: name.to_string(),
            description: description.map(|s| s.to_string()),
            locked: false,
        })
    }

    /// Find a note by its external uuid (exact match only).
    pub fn find_note_by_uuid(&self, uuid: &str) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, uuid, name, description, locked FROM notes WHERE uuid = ?1",
        )?;

        stmt.query_row([uuid], |row| Self::row_to_note(row)).optional()
    }

    /// List all notes in creation order (internal id ascending).
    pub fn list_notes(&self) -> SqliteResult<Vec<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, uuid, name, description, locked FROM notes ORDER BY id ASC",
        )?;

        let notes = stmt
            .query_map([], |row| Self::row_to_note(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(notes)
    }

    /// Partial field update. A `None` field keeps its previous value.
    /// Locked rows never match; returns whether a row was updated.
    pub fn update_note_fields(
        &self,
        uuid: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();

        let rows = conn.execute(
            "UPDATE notes SET
                name = COALESCE(?2, name),
                description = COALESCE(?3, description)
             WHERE uuid = ?1 AND locked = 0",
            rusqlite::params![uuid, name, description],
        )?;

        Ok(rows > 0)
    }

    /// Set the lock flag. Only matches a row that is still unlocked, so the
    /// false→true transition can happen at most once.
    pub fn set_note_locked(&self, uuid: &str) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();

        let rows = conn.execute(
            "UPDATE notes SET locked = 1 WHERE uuid = ?1 AND locked = 0",
            [uuid],
        )?;

        Ok(rows > 0)
    }

    /// Delete the row. Locked rows never match.
    pub fn delete_note(&self, uuid: &str) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();

        let rows = conn.execute("DELETE FROM notes WHERE uuid = ?1 AND locked = 0", [uuid])?;

        Ok(rows > 0)
    }

    /// Total row count (used by the simulation endpoints).
    pub fn count_notes(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
    }

    /// Notes that are still unlocked (used by the simulation endpoints).
    pub fn count_unlocked_notes(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM notes WHERE locked = 0", [], |row| {
            row.get(0)
        })
    }

    fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<Note> {
        Ok(Note {
            id: row.get(0)?,
            uuid: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            locked: row.get::<_, i32>(4)? != 0,
        })
    }
}
