//! Note collection repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the whole note collection as one JSON document under a single
//!   well-known key.
//!
//! # Invariants
//! - `save_all` replaces the collection in one statement; last writer wins.
//! - A missing key is a valid empty collection, not an error.

use crate::db::DbError;
use crate::model::note::{Note, NoteValidationError};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

/// Storage key holding the serialized notes collection.
pub const NOTES_STORAGE_KEY: &str = "notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level failure for the notes collection.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] NoteValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("invalid persisted note data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Whole-collection persistence for notes.
pub trait NoteRepository {
    /// Reads the persisted collection; empty when nothing was saved yet.
    fn load_all(&self) -> RepoResult<Vec<Note>>;
    /// Replaces the persisted collection with `notes`.
    fn save_all(&self, notes: &[Note]) -> RepoResult<()>;
}

/// SQLite-backed notes repository over the `kv_store` table.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_kv_store_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn load_all(&self) -> RepoResult<Vec<Note>> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [NOTES_STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json).map_err(|err| {
                RepoError::InvalidData(format!("key `{NOTES_STORAGE_KEY}` is not a note array: {err}"))
            }),
        }
    }

    fn save_all(&self, notes: &[Note]) -> RepoResult<()> {
        for note in notes {
            note.validate()?;
        }

        let json = serde_json::to_string(notes)
            .map_err(|err| RepoError::InvalidData(format!("failed to encode notes: {err}")))?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![NOTES_STORAGE_KEY, json],
        )?;
        Ok(())
    }
}

fn ensure_kv_store_ready(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'kv_store'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::InvalidData(
            "kv_store table is missing; open the connection with open_db".to_string(),
        ))
    }
}
