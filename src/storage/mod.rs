//! All things related to the storage of notes

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::notes::Note;
use crate::notes::NoteId;
use crate::notes::UserId;

pub use memory::Memory;
pub use postgres::Postgres;

mod memory;
mod postgres;

/// Table used when none is configured
pub const DEFAULT_TABLE: &str = "note";

/// Longest identifier PostgreSQL accepts without truncating
const MAX_TABLE_LENGTH: usize = 63;

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the backend, passed on as is
    #[error(transparent)]
    Backend(#[from] sqlx::Error),

    /// A stored row does not fit the note entity
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// The table name is not a plain SQL identifier
    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Name of the table holding the notes
///
/// Only lowercase ASCII letters, digits and underscores are accepted, so the
/// name can be used in a query as is
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    /// Validate a table name
    pub fn new(name: &str) -> Result<Self> {
        let mut chars = name.chars();

        let valid_start = chars
            .next()
            .is_some_and(|ch| ch.is_ascii_lowercase() || ch == '_');
        let valid_rest = chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_');

        if !valid_start || !valid_rest || name.len() > MAX_TABLE_LENGTH {
            return Err(Error::InvalidTable(name.to_string()));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(DEFAULT_TABLE.to_string())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a mutation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Affected {
    /// Number of rows changed
    rows_affected: u64,

    /// ID of the inserted note, only set by a create
    last_insert_id: Option<NoteId>,
}

impl Affected {
    /// Result of an update or delete
    pub const fn rows(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_insert_id: None,
        }
    }

    /// Result of a create
    pub const fn inserted(id: NoteId) -> Self {
        Self {
            rows_affected: 1,
            last_insert_id: Some(id),
        }
    }

    pub const fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    pub const fn last_insert_id(&self) -> Option<NoteId> {
        self.last_insert_id
    }

    /// Did the mutation leave everything as it was
    pub const fn is_noop(&self) -> bool {
        self.rows_affected() == 0
    }
}

/// Storage of notes, every operation is scoped to the owning user
#[async_trait]
pub trait NoteStore: Clone + Send + Sync + 'static {
    /// Find a single note of a user
    ///
    /// Respects the soft-delete
    async fn fetch_by_id(&self, id: NoteId, user_id: UserId) -> Result<Option<Note>>;

    /// Find all notes of a user
    ///
    /// Respects the soft-delete
    async fn fetch_all_by_user(&self, user_id: UserId) -> Result<Vec<Note>>;

    /// Find at most `page_size` notes of a user, skipping the first `page_offset`
    ///
    /// Respects the soft-delete
    async fn fetch_page_by_user(
        &self,
        user_id: UserId,
        page_size: u32,
        page_offset: u32,
    ) -> Result<Vec<Note>>;

    /// Count the notes of a user
    ///
    /// Respects the soft-delete
    async fn count_by_user(&self, user_id: UserId) -> Result<u64>;

    /// Create a note
    async fn create(&self, name: &str, user_id: UserId) -> Result<Affected>;

    /// Rename a note
    ///
    /// Respects the soft-delete, affects nothing when the note is gone
    async fn update(&self, name: &str, id: NoteId, user_id: UserId) -> Result<Affected>;

    /// Remove a note for good
    ///
    /// Respects the soft-delete: a soft-deleted note stays
    async fn delete_hard(&self, id: NoteId, user_id: UserId) -> Result<Affected>;

    /// Soft-delete a note
    async fn delete_soft(&self, id: NoteId, user_id: UserId) -> Result<Affected>;
}
