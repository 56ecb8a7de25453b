//! Postgres storage

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::notes::Note;
use crate::notes::NoteId;
use crate::notes::UserId;

use super::Affected;
use super::Error;
use super::NoteStore;
use super::Result;
use super::TableName;

/// Columns selected for every note query
const COLUMNS: &str = "id, name, user_id, created_at, updated_at, deleted_at";

/// Postgres storage
#[derive(Clone, Debug)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,

    /// Table holding the notes
    table: TableName,
}

impl Postgres {
    /// Create Postgres storage on the default `note` table
    ///
    /// The table is expected to exist
    pub fn new(connection_pool: PgPool) -> Self {
        Self::with_table(connection_pool, TableName::default())
    }

    /// Create Postgres storage on a specific table
    pub fn with_table(connection_pool: PgPool, table: TableName) -> Self {
        Self {
            connection_pool,
            table,
        }
    }
}

/// Postgres version of a note
#[derive(sqlx::FromRow)]
struct PostgresNote {
    /// Note ID
    id: i64,

    /// Name
    name: String,

    /// Owning user
    user_id: i64,

    /// Creation date
    created_at: Option<NaiveDateTime>,

    /// Last updated at
    updated_at: Option<NaiveDateTime>,

    /// Deleted at
    deleted_at: Option<NaiveDateTime>,
}

impl Note {
    /// Create note from postgres version
    fn from_postgres_note(note: PostgresNote) -> Result<Self> {
        Ok(Self {
            id: key_from_postgres("id", note.id)?,
            name: note.name,
            user_id: key_from_postgres("user_id", note.user_id)?,
            created_at: note.created_at.into(),
            updated_at: note.updated_at.into(),
            deleted_at: note.deleted_at.into(),
        })
    }

    /// Maybe create note from postgres version
    fn from_postgres_note_optional(note: Option<PostgresNote>) -> Result<Option<Self>> {
        note.map(Self::from_postgres_note).transpose()
    }

    /// Create multiple notes from postgres version
    fn from_postgres_note_multiple(notes: Vec<PostgresNote>) -> Result<Vec<Self>> {
        notes.into_iter().map(Self::from_postgres_note).collect()
    }
}

/// Narrow a `BIGINT` key to the entity's key type
fn key_from_postgres(column: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::InvalidRow(format!("{column} {value} is not a valid key")))
}

#[async_trait]
impl NoteStore for Postgres {
    async fn fetch_by_id(&self, id: NoteId, user_id: UserId) -> Result<Option<Note>> {
        let query = format!(
            r"
            SELECT {COLUMNS}
            FROM {}
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            LIMIT 1
            ",
            self.table,
        );

        let note = sqlx::query_as::<_, PostgresNote>(&query)
            .bind(i64::from(id))
            .bind(i64::from(user_id))
            .fetch_optional(&self.connection_pool)
            .await?;

        Note::from_postgres_note_optional(note)
    }

    async fn fetch_all_by_user(&self, user_id: UserId) -> Result<Vec<Note>> {
        let query = format!(
            r"
            SELECT {COLUMNS}
            FROM {}
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY id
            ",
            self.table,
        );

        let notes = sqlx::query_as::<_, PostgresNote>(&query)
            .bind(i64::from(user_id))
            .fetch_all(&self.connection_pool)
            .await?;

        Note::from_postgres_note_multiple(notes)
    }

    async fn fetch_page_by_user(
        &self,
        user_id: UserId,
        page_size: u32,
        page_offset: u32,
    ) -> Result<Vec<Note>> {
        let query = format!(
            r"
            SELECT {COLUMNS}
            FROM {}
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY id
            LIMIT $2 OFFSET $3
            ",
            self.table,
        );

        let notes = sqlx::query_as::<_, PostgresNote>(&query)
            .bind(i64::from(user_id))
            .bind(i64::from(page_size))
            .bind(i64::from(page_offset))
            .fetch_all(&self.connection_pool)
            .await?;

        Note::from_postgres_note_multiple(notes)
    }

    async fn count_by_user(&self, user_id: UserId) -> Result<u64> {
        let query = format!(
            r"
            SELECT count(*)
            FROM {}
            WHERE user_id = $1 AND deleted_at IS NULL
            ",
            self.table,
        );

        let count = sqlx::query_scalar::<_, i64>(&query)
            .bind(i64::from(user_id))
            .fetch_one(&self.connection_pool)
            .await?;

        u64::try_from(count).map_err(|_| Error::InvalidRow(format!("negative count {count}")))
    }

    async fn create(&self, name: &str, user_id: UserId) -> Result<Affected> {
        let query = format!(
            r"
            INSERT INTO {} (name, user_id)
            VALUES ($1, $2)
            RETURNING id
            ",
            self.table,
        );

        let id = sqlx::query_scalar::<_, i64>(&query)
            .bind(name)
            .bind(i64::from(user_id))
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(Affected::inserted(key_from_postgres("id", id)?))
    }

    async fn update(&self, name: &str, id: NoteId, user_id: UserId) -> Result<Affected> {
        let query = format!(
            r"
            UPDATE {}
            SET name = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND user_id = $3 AND deleted_at IS NULL
            ",
            self.table,
        );

        let result = sqlx::query(&query)
            .bind(name)
            .bind(i64::from(id))
            .bind(i64::from(user_id))
            .execute(&self.connection_pool)
            .await?;

        Ok(Affected::rows(result.rows_affected()))
    }

    async fn delete_hard(&self, id: NoteId, user_id: UserId) -> Result<Affected> {
        let query = format!(
            r"
            DELETE FROM {}
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            ",
            self.table,
        );

        let result = sqlx::query(&query)
            .bind(i64::from(id))
            .bind(i64::from(user_id))
            .execute(&self.connection_pool)
            .await?;

        Ok(Affected::rows(result.rows_affected()))
    }

    async fn delete_soft(&self, id: NoteId, user_id: UserId) -> Result<Affected> {
        let query = format!(
            r"
            UPDATE {}
            SET deleted_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            ",
            self.table,
        );

        let result = sqlx::query(&query)
            .bind(i64::from(id))
            .bind(i64::from(user_id))
            .execute(&self.connection_pool)
            .await?;

        Ok(Affected::rows(result.rows_affected()))
    }
}
