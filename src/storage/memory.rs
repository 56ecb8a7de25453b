//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::notes::Note;
use crate::notes::NoteId;
use crate::notes::NullTime;
use crate::notes::UserId;

use super::Affected;
use super::NoteStore;
use super::Result;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All notes in storage, soft-deleted ones included
    notes: Arc<Mutex<BTreeMap<NoteId, Note>>>,

    /// Last handed out note ID, never reused
    last_id: Arc<AtomicU32>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

/// Current time as the storage records it
fn now() -> NullTime {
    Utc::now().naive_utc().into()
}

/// Is the note owned by the user and not soft-deleted
fn is_active_for(note: &Note, user_id: UserId) -> bool {
    note.user_id == user_id && !note.is_deleted()
}

#[async_trait]
impl NoteStore for Memory {
    async fn fetch_by_id(&self, id: NoteId, user_id: UserId) -> Result<Option<Note>> {
        Ok(self
            .notes
            .lock()
            .await
            .get(&id)
            .filter(|note| is_active_for(note, user_id))
            .cloned())
    }

    async fn fetch_all_by_user(&self, user_id: UserId) -> Result<Vec<Note>> {
        Ok(self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| is_active_for(note, user_id))
            .cloned()
            .collect())
    }

    async fn fetch_page_by_user(
        &self,
        user_id: UserId,
        page_size: u32,
        page_offset: u32,
    ) -> Result<Vec<Note>> {
        Ok(self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| is_active_for(note, user_id))
            .skip(page_offset as usize)
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn count_by_user(&self, user_id: UserId) -> Result<u64> {
        Ok(self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| is_active_for(note, user_id))
            .count() as u64)
    }

    async fn create(&self, name: &str, user_id: UserId) -> Result<Affected> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created_at = now();

        let note = Note {
            id,
            name: name.to_string(),
            user_id,
            created_at,
            updated_at: created_at,
            deleted_at: NullTime::null(),
        };

        self.notes.lock().await.insert(id, note);

        Ok(Affected::inserted(id))
    }

    async fn update(&self, name: &str, id: NoteId, user_id: UserId) -> Result<Affected> {
        let mut notes = self.notes.lock().await;

        let Some(note) = notes
            .get_mut(&id)
            .filter(|note| is_active_for(note, user_id))
        else {
            return Ok(Affected::rows(0));
        };

        note.name = name.to_string();
        note.updated_at = now();

        Ok(Affected::rows(1))
    }

    async fn delete_hard(&self, id: NoteId, user_id: UserId) -> Result<Affected> {
        let mut notes = self.notes.lock().await;

        if !notes.get(&id).is_some_and(|note| is_active_for(note, user_id)) {
            return Ok(Affected::rows(0));
        }

        notes.remove(&id);

        Ok(Affected::rows(1))
    }

    async fn delete_soft(&self, id: NoteId, user_id: UserId) -> Result<Affected> {
        let mut notes = self.notes.lock().await;

        let Some(note) = notes
            .get_mut(&id)
            .filter(|note| is_active_for(note, user_id))
        else {
            return Ok(Affected::rows(0));
        };

        note.deleted_at = now();

        Ok(Affected::rows(1))
    }
}
