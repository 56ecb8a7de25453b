//! Notes API endpoints
//!
//! Everything related to managing the notes of the current user

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use crate::notes::Note;
use crate::notes::NoteId;
use crate::notes::NullTime;
use crate::notes::UserId;
use crate::prettytime::null_time;
use crate::prettytime::pretty_time;
use crate::storage::NoteStore;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::QueryParameters;
use super::Success;
use super::parse_name;

/// Page size when the request does not specify one
const DEFAULT_PER_PAGE: u32 = 10;

/// Note response going to the user
///
/// Basically filtering which fields are shown to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    /// Note ID
    pub id: NoteId,

    /// Name of the note
    pub name: String,

    /// Creation date
    pub created_at: NullTime,

    /// Last updated at
    pub updated_at: NullTime,

    /// Creation date, human readable
    pub created_display: String,

    /// Last change, human readable
    pub display_time: String,
}

impl NoteResponse {
    /// Create a response from a [`Note`](Note)
    fn from_note(note: Note) -> Self {
        Self {
            created_display: null_time(&note.created_at),
            display_time: pretty_time(&note.created_at, &note.updated_at),
            id: note.id,
            name: note.name,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }

    /// Create a response from multiple [`Note`](Note)s
    fn from_note_multiple(notes: Vec<Note>) -> Vec<Self> {
        notes.into_iter().map(Self::from_note).collect()
    }
}

/// A single page of notes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePageResponse {
    /// Notes on this page
    pub notes: Vec<NoteResponse>,

    /// Current page, starting at 1
    pub page: u32,

    /// Maximum number of notes on a page
    pub per_page: u32,

    /// Number of notes of the user
    pub total_notes: u64,

    /// Number of pages needed for all notes
    pub total_pages: u64,
}

/// Either all notes or a single page
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NoteListResponse {
    All(Vec<NoteResponse>),
    Page(NotePageResponse),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    page: Option<u32>,
    per_page: Option<u32>,
}

/// List the notes of the current user
///
/// Request:
/// ```sh
/// curl -v -H 'X-User-Id: 1' 'http://localhost:8080/api/notes?page=1&perPage=10'
/// ```
///
/// Without `page` and `perPage` all notes are returned at once
pub async fn list<S: NoteStore>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    QueryParameters(query): QueryParameters<ListQuery>,
) -> Result<Success<NoteListResponse>, Error> {
    if query.page.is_none() && query.per_page.is_none() {
        let notes = storage
            .fetch_all_by_user(current_user.id)
            .await
            .map_err(Error::internal_server_error)?;

        return Ok(Success::ok(NoteListResponse::All(
            NoteResponse::from_note_multiple(notes),
        )));
    }

    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);

    if page == 0 {
        return Err(Error::bad_request("Page starts at 1"));
    }

    if per_page == 0 {
        return Err(Error::bad_request("Page size must be positive"));
    }

    let offset = (page - 1)
        .checked_mul(per_page)
        .ok_or_else(|| Error::bad_request("Page out of range"))?;

    let total_notes = storage
        .count_by_user(current_user.id)
        .await
        .map_err(Error::internal_server_error)?;

    let notes = storage
        .fetch_page_by_user(current_user.id, per_page, offset)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(NoteListResponse::Page(NotePageResponse {
        notes: NoteResponse::from_note_multiple(notes),
        page,
        per_page,
        total_notes,
        total_pages: total_notes.div_ceil(u64::from(per_page)),
    })))
}

/// Get a single note of the current user
///
/// Request:
/// ```sh
/// curl -v -H 'X-User-Id: 1' http://localhost:8080/api/notes/1
/// ```
pub async fn single<S: NoteStore>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<NoteId>,
) -> Result<Success<NoteResponse>, Error> {
    get_note(&storage, note_id, current_user.id)
        .await
        .map(|note| Success::ok(NoteResponse::from_note(note)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteForm {
    name: String,
}

/// Create a note for the current user
///
/// Request:
/// ```sh
/// curl -v \
///     -H 'X-User-Id: 1' \
///     -H 'Content-Type: application/json' \
///     http://localhost:8080/api/notes \
///     -d '{ "name": "Groceries" }'
/// ```
pub async fn create<S: NoteStore>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    Form(form): Form<NoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let name = parse_name(&form.name)?;

    let affected = storage
        .create(&name, current_user.id)
        .await
        .map_err(Error::internal_server_error)?;

    let note_id = affected
        .last_insert_id()
        .ok_or_else(|| Error::internal_server_error("Created note has no ID"))?;

    tracing::debug!("Created note {note_id} for user {}", current_user.id);

    let note = storage
        .fetch_by_id(note_id, current_user.id)
        .await
        .map_err(Error::internal_server_error)?
        .ok_or_else(|| Error::internal_server_error("Created note went missing"))?;

    Ok(Success::created(NoteResponse::from_note(note)))
}

/// Rename a note of the current user
///
/// Request:
/// ```sh
/// curl -v -X PATCH \
///     -H 'X-User-Id: 1' \
///     -H 'Content-Type: application/json' \
///     http://localhost:8080/api/notes/1 \
///     -d '{ "name": "Groceries for Sunday" }'
/// ```
pub async fn update<S: NoteStore>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<NoteId>,
    Form(form): Form<NoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let name = parse_name(&form.name)?;

    let affected = storage
        .update(&name, note_id, current_user.id)
        .await
        .map_err(Error::internal_server_error)?;

    if affected.is_noop() {
        return Err(Error::not_found("Note not found"));
    }

    get_note(&storage, note_id, current_user.id)
        .await
        .map(|note| Success::ok(NoteResponse::from_note(note)))
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    permanent: bool,
}

/// Delete a note of the current user
///
/// Soft-deletes by default, `?permanent=true` removes the note for good
///
/// Request:
/// ```sh
/// curl -v -X DELETE -H 'X-User-Id: 1' 'http://localhost:8080/api/notes/1?permanent=true'
/// ```
pub async fn delete<S: NoteStore>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<NoteId>,
    QueryParameters(query): QueryParameters<DeleteQuery>,
) -> Result<Success<&'static str>, Error> {
    let affected = if query.permanent {
        storage.delete_hard(note_id, current_user.id).await
    } else {
        storage.delete_soft(note_id, current_user.id).await
    }
    .map_err(Error::internal_server_error)?;

    if affected.is_noop() {
        return Err(Error::not_found("Note not found"));
    }

    tracing::debug!(
        "Deleted note {note_id} for user {} (permanent: {})",
        current_user.id,
        query.permanent
    );

    Ok(Success::<&'static str>::no_content())
}

async fn get_note<S: NoteStore>(storage: &S, note_id: NoteId, user_id: UserId) -> Result<Note, Error> {
    storage
        .fetch_by_id(note_id, user_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Note not found")), Ok)
}
