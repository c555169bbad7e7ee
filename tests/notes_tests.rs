mod common;

use axum::http::StatusCode;
use common::{create_test_app, register_token, send};
use serde_json::{Value, json};

async fn first_notebook(app: &axum::Router, token: &str) -> String {
    let (_, list) = send(app, "GET", "/notebooks", Some(token), None).await;
    list[0]["id"].as_str().unwrap().to_string()
}

async fn create_note(app: &axum::Router, token: &str, notebook_id: &str, content: &str) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/notes",
        Some(token),
        Some(json!({"notebookId": notebook_id, "content": content})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create note failed: {json}");
    json
}

#[tokio::test]
async fn test_create_note_in_own_notebook() {
    let (app, _db) = create_test_app().await;
    let token = register_token(&app, "alice@x.com").await;
    let notebook_id = first_notebook(&app, &token).await;

    let note = create_note(&app, &token, &notebook_id, "Mitochondria").await;

    assert_eq!(note["content"], "Mitochondria");
    assert_eq!(note["notebookId"], notebook_id.as_str());
    assert!(note["createdAt"].as_str().is_some());
}

#[tokio::test]
async fn test_create_note_missing_fields() {
    let (app, _db) = create_test_app().await;
    let token = register_token(&app, "alice@x.com").await;
    let notebook_id = first_notebook(&app, &token).await;

    for body in [
        json!({"content": "x"}),
        json!({"notebookId": notebook_id}),
        json!({"notebookId": notebook_id, "content": "  "}),
    ] {
        let (status, json) = send(&app, "POST", "/notes", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "missing fields");
    }
}

#[tokio::test]
async fn test_create_note_in_foreign_notebook_forbidden() {
    let (app, _db) = create_test_app().await;
    let alice = register_token(&app, "alice@x.com").await;
    let bob = register_token(&app, "bob@x.com").await;
    let alice_notebook = first_notebook(&app, &alice).await;

    let (status, json) = send(
        &app,
        "POST",
        "/notes",
        Some(&bob),
        Some(json!({"notebookId": alice_notebook, "content": "sneaky"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "notebook not found");

    let (status, json) = send(
        &app,
        "POST",
        "/notes",
        Some(&bob),
        Some(json!({"notebookId": "does-not-exist", "content": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "notebook not found");

    let (_, notes) = send(&app, "GET", "/notes", Some(&alice), None).await;
    assert!(notes.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_notes_newest_first_and_filtered() {
    let (app, _db) = create_test_app().await;
    let token = register_token(&app, "alice@x.com").await;
    let default_nb = first_notebook(&app, &token).await;
    let (_, other_nb) = send(
        &app,
        "POST",
        "/notebooks",
        Some(&token),
        Some(json!({"title": "Other"})),
    )
    .await;
    let other_nb = other_nb["id"].as_str().unwrap().to_string();

    create_note(&app, &token, &default_nb, "first").await;
    create_note(&app, &token, &other_nb, "second").await;
    create_note(&app, &token, &default_nb, "third").await;

    let (_, all) = send(&app, "GET", "/notes", Some(&token), None).await;
    let contents: Vec<_> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["third", "second", "first"]);

    let (_, filtered) = send(
        &app,
        "GET",
        &format!("/notes?notebookId={}", default_nb),
        Some(&token),
        None,
    )
    .await;
    let contents: Vec<_> = filtered
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["third", "first"]);
}

#[tokio::test]
async fn test_list_notes_never_leaks_other_users() {
    let (app, _db) = create_test_app().await;
    let alice = register_token(&app, "alice@x.com").await;
    let bob = register_token(&app, "bob@x.com").await;
    let alice_nb = first_notebook(&app, &alice).await;
    create_note(&app, &alice, &alice_nb, "private").await;

    let (_, notes) = send(&app, "GET", "/notes", Some(&bob), None).await;
    assert!(notes.as_array().unwrap().is_empty());

    let (_, notes) = send(
        &app,
        "GET",
        &format!("/notes?notebookId={}", alice_nb),
        Some(&bob),
        None,
    )
    .await;
    assert!(notes.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_note() {
    let (app, _db) = create_test_app().await;
    let token = register_token(&app, "alice@x.com").await;
    let nb = first_notebook(&app, &token).await;
    let note = create_note(&app, &token, &nb, "draft").await;
    let id = note["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/notes/{}", id),
        Some(&token),
        Some(json!({"content": "final"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "final");
    assert_eq!(updated["createdAt"], note["createdAt"]);

    // No fields: nothing changes
    let (status, unchanged) =
        send(&app, "PATCH", &format!("/notes/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["content"], "final");
}

#[tokio::test]
async fn test_update_note_not_owned() {
    let (app, _db) = create_test_app().await;
    let alice = register_token(&app, "alice@x.com").await;
    let bob = register_token(&app, "bob@x.com").await;
    let nb = first_notebook(&app, &alice).await;
    let note = create_note(&app, &alice, &nb, "mine").await;
    let id = note["id"].as_str().unwrap();

    let (status, json) = send(
        &app,
        "PATCH",
        &format!("/notes/{}", id),
        Some(&bob),
        Some(json!({"content": "hijacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "note not found");

    let (_, notes) = send(&app, "GET", "/notes", Some(&alice), None).await;
    assert_eq!(notes[0]["content"], "mine");
}

#[tokio::test]
async fn test_update_note_rejects_blank_content() {
    let (app, _db) = create_test_app().await;
    let token = register_token(&app, "alice@x.com").await;
    let nb = first_notebook(&app, &token).await;
    let note = create_note(&app, &token, &nb, "keep").await;
    let id = note["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/notes/{}", id),
        Some(&token),
        Some(json!({"content": " "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_notes_bad_query_is_json_error() {
    let (app, _db) = create_test_app().await;
    let token = register_token(&app, "alice@x.com").await;

    let (status, json) = send(
        &app,
        "GET",
        "/notes?notebookId=a&notebookId=b",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid query");
}

#[tokio::test]
async fn test_update_foreign_or_missing_note_checks_ownership_first() {
    let (app, _db) = create_test_app().await;
    let alice = register_token(&app, "alice@x.com").await;
    let bob = register_token(&app, "bob@x.com").await;
    let nb = first_notebook(&app, &alice).await;
    let note = create_note(&app, &alice, &nb, "mine").await;

    for id in [note["id"].as_str().unwrap(), "does-not-exist"] {
        let (status, json) = send(
            &app,
            "PATCH",
            &format!("/notes/{}", id),
            Some(&bob),
            Some(json!({"content": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "note not found");
    }
}
