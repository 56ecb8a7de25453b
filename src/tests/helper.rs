use axum::Router;
use axum::body::Body;
use axum::body::Bytes;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use serde_json::Map;
use serde_json::Value;
use tower::Service;

use crate::api::USER_ID_HEADER;
use crate::create_router;
use crate::storage::Memory;

/// Test helper version of Note struct
#[derive(Debug, PartialEq, Eq)]
pub struct Note {
    pub id: u64,
    pub name: String,
    pub display_time: String,
}

/// Test helper version of a page of notes
#[derive(Debug)]
pub struct NotePage {
    pub notes: Vec<Note>,
    pub page: u64,
    pub per_page: u64,
    pub total_notes: u64,
    pub total_pages: u64,
}

/// Error response
#[derive(Debug, PartialEq, Eq)]
pub struct Error {
    pub error: String,
    pub description: Option<String>,
}

/// Setup the app on an empty memory storage
pub fn setup_test_app() -> Router {
    create_router(Memory::new())
}

/// Send a request as a user, returning the status code and raw body
pub async fn send(
    app: &mut Router,
    method: Method,
    uri: &str,
    user_id: Option<&str>,
    body: Option<(&str, bool)>,
) -> (StatusCode, Bytes) {
    let mut request = Request::builder().method(method).uri(uri);

    if let Some(user_id) = user_id {
        request = request.header(&USER_ID_HEADER, user_id);
    }

    let body = match body {
        Some((body, with_content_type)) => {
            if with_content_type {
                request = request.header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
            }

            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app.call(request.body(body).unwrap()).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status_code, body)
}

pub async fn list_notes(app: &mut Router, user_id: u32) -> (StatusCode, Option<Vec<Note>>) {
    let (status_code, body) =
        send(app, Method::GET, "/api/notes", Some(&user_id.to_string()), None).await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_notes(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_list_page(
    app: &mut Router,
    user_id: u32,
    query: &str,
) -> (StatusCode, Option<NotePage>, Option<String>) {
    let (status_code, body) = send(
        app,
        Method::GET,
        &format!("/api/notes?{query}"),
        Some(&user_id.to_string()),
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_note_page(&body))
        } else {
            None
        },
        if status_code == StatusCode::OK {
            None
        } else {
            Some(get_error_message(&body))
        },
    )
}

pub async fn single_note(
    app: &mut Router,
    user_id: u32,
    id: u64,
) -> (StatusCode, Option<Note>, Option<String>) {
    single_note_with_str(app, user_id, &id.to_string()).await
}

pub async fn single_note_with_str(
    app: &mut Router,
    user_id: u32,
    id: &str,
) -> (StatusCode, Option<Note>, Option<String>) {
    let (status_code, body) = send(
        app,
        Method::GET,
        &format!("/api/notes/{id}"),
        Some(&user_id.to_string()),
        None,
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_note(&body))
        } else {
            None
        },
        if status_code == StatusCode::BAD_REQUEST || status_code == StatusCode::NOT_FOUND {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_create_note_with_raw_body(
    app: &mut Router,
    user_id: u32,
    body: &str,
    with_content_type: bool,
) -> (StatusCode, Option<Note>, Option<Error>) {
    let (status_code, body) = send(
        app,
        Method::POST,
        "/api/notes",
        Some(&user_id.to_string()),
        Some((body, with_content_type)),
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::CREATED {
            Some(get_note(&body))
        } else {
            None
        },
        if status_code == StatusCode::BAD_REQUEST {
            Some(get_error(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_create_note(
    app: &mut Router,
    user_id: u32,
    name: &str,
) -> (StatusCode, Option<Note>, Option<String>) {
    let mut payload = Map::new();
    payload.insert("name".to_string(), Value::String(name.to_string()));

    let (status_code, note, error) = maybe_create_note_with_raw_body(
        app,
        user_id,
        &serde_json::to_string(&payload).unwrap(),
        true,
    )
    .await;

    (status_code, note, error.map(|error| error.error))
}

/// Create a note that is expected to succeed
pub async fn create_note(app: &mut Router, user_id: u32, name: &str) -> Note {
    let (status_code, note, _) = maybe_create_note(app, user_id, name).await;
    assert_eq!(StatusCode::CREATED, status_code);

    note.unwrap()
}

pub async fn maybe_update_note(
    app: &mut Router,
    user_id: u32,
    id: u64,
    name: &str,
) -> (StatusCode, Option<Note>, Option<String>) {
    let mut payload = Map::new();
    payload.insert("name".to_string(), Value::String(name.to_string()));

    let (status_code, body) = send(
        app,
        Method::PATCH,
        &format!("/api/notes/{id}"),
        Some(&user_id.to_string()),
        Some((&serde_json::to_string(&payload).unwrap(), true)),
    )
    .await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_note(&body))
        } else {
            None
        },
        if status_code == StatusCode::BAD_REQUEST || status_code == StatusCode::NOT_FOUND {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_delete_note(
    app: &mut Router,
    user_id: u32,
    id: u64,
    permanent: bool,
) -> (StatusCode, Option<String>) {
    let uri = if permanent {
        format!("/api/notes/{id}?permanent=true")
    } else {
        format!("/api/notes/{id}")
    };

    let (status_code, body) =
        send(app, Method::DELETE, &uri, Some(&user_id.to_string()), None).await;

    (
        status_code,
        if status_code == StatusCode::BAD_REQUEST || status_code == StatusCode::NOT_FOUND {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

fn value_to_note(note: &Map<String, Value>) -> Note {
    Note {
        id: note["id"].as_u64().unwrap(),
        name: note["name"].as_str().map(ToString::to_string).unwrap(),
        display_time: note["displayTime"]
            .as_str()
            .map(ToString::to_string)
            .unwrap(),
    }
}

fn values_to_notes(notes: &Value) -> Vec<Note> {
    notes
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_object().unwrap())
        .map(value_to_note)
        .collect()
}

fn get_note(body: &Bytes) -> Note {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["data"]
        .as_object()
        .map(value_to_note)
        .unwrap()
}

fn get_notes(body: &Bytes) -> Vec<Note> {
    values_to_notes(&serde_json::from_slice::<Value>(&body[..]).unwrap()["data"])
}

fn get_note_page(body: &Bytes) -> NotePage {
    let data = &serde_json::from_slice::<Value>(&body[..]).unwrap()["data"];

    NotePage {
        notes: values_to_notes(&data["notes"]),
        page: data["page"].as_u64().unwrap(),
        per_page: data["perPage"].as_u64().unwrap(),
        total_notes: data["totalNotes"].as_u64().unwrap(),
        total_pages: data["totalPages"].as_u64().unwrap(),
    }
}

fn value_to_error(error: &Map<String, Value>) -> Error {
    Error {
        error: error["error"].as_str().map(ToString::to_string).unwrap(),
        description: error
            .get("description")
            .and_then(Value::as_str)
            .map(ToString::to_string),
    }
}

pub fn get_error(body: &Bytes) -> Error {
    serde_json::from_slice::<Value>(&body[..])
        .unwrap()
        .as_object()
        .map(value_to_error)
        .unwrap()
}

pub fn get_error_message(body: &Bytes) -> String {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["error"]
        .as_str()
        .map(ToString::to_string)
        .unwrap()
}
