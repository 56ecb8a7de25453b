use chrono::NaiveDateTime;
use serde::Serialize;

/// Identifier of a note, assigned by the storage
pub type NoteId = u32;

/// Identifier of the user owning a note
pub type UserId = u32;

/// A timestamp that may be absent
///
/// Serializes as the timestamp itself or `null`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NullTime(Option<NaiveDateTime>);

impl NullTime {
    /// An absent timestamp
    pub const fn null() -> Self {
        Self(None)
    }

    /// Does it hold a timestamp
    pub const fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// The timestamp, if any
    pub const fn time(&self) -> Option<NaiveDateTime> {
        self.0
    }
}

impl From<Option<NaiveDateTime>> for NullTime {
    fn from(time: Option<NaiveDateTime>) -> Self {
        Self(time)
    }
}

impl From<NaiveDateTime> for NullTime {
    fn from(time: NaiveDateTime) -> Self {
        Self(Some(time))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub name: String,
    pub user_id: UserId,
    pub created_at: NullTime,
    pub updated_at: NullTime,
    pub deleted_at: NullTime,
}

impl Note {
    /// Is the note soft-deleted
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_valid()
    }
}
