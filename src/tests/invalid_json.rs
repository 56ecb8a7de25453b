use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_invalid_json() {
    let mut app = helper::setup_test_app();

    // missing data
    let body = r"{}";
    let (status_code, _, error) =
        helper::maybe_create_note_with_raw_body(&mut app, 1, body, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(error.is_some());
    let error = error.unwrap();
    assert_eq!("Data error".to_string(), error.error);
    assert!(error.description.is_some());

    // wrong type
    let body = r#"{"name":42}"#;
    let (status_code, _, error) =
        helper::maybe_create_note_with_raw_body(&mut app, 1, body, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Data error".to_string(), error.unwrap().error);

    // syntax error
    let body = r#"{"}"#;
    let (status_code, _, error) =
        helper::maybe_create_note_with_raw_body(&mut app, 1, body, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(error.is_some());
    let error = error.unwrap();
    assert_eq!("JSON syntax error".to_string(), error.error);
    assert!(error.description.is_some());

    // missing content type
    let body = r#"{"name":"Groceries"}"#;
    let (status_code, _, error) =
        helper::maybe_create_note_with_raw_body(&mut app, 1, body, false).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(error.is_some());
    let error = error.unwrap();
    assert_eq!(
        "Missing `application/json` content type".to_string(),
        error.error
    );

    // nothing got created along the way
    let (status_code, notes) = helper::list_notes(&mut app, 1).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(Vec::<helper::Note>::new()), notes);
}
