use thiserror::Error;

/// Failures a note operation can produce. Every variant is local to a single
/// request; nothing here triggers a retry.
#[derive(Debug, Error)]
pub enum NoteError {
    /// No note matches the given uuid.
    #[error("Note not found")]
    NotFound,

    /// The note is locked, which rejects updates and deletes wholesale.
    #[error("Note is locked")]
    Locked,

    /// Lock was called on a note that is already locked.
    #[error("Note is already locked")]
    AlreadyLocked,

    /// The storage medium failed. Every mutation is a single SQLite
    /// statement, so a failed write leaves the row exactly as it was.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}
