//! Notes API.
//!
//! All endpoints require a bearer access token. A note can only be filed
//! under a notebook its author owns.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::{ApiError, ResultExt, is_blank};
use super::extract::{ApiJson, ApiQuery, Patch};
use crate::auth::ApiAuth;
use crate::db::Database;
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct NotesState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

impl_has_auth_backend!(NotesState);

pub fn router(state: NotesState) -> Router {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/{id}", patch(update_note))
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListNotesQuery {
    notebook_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNoteRequest {
    notebook_id: Option<String>,
    content: Option<String>,
}

#[derive(Deserialize)]
struct UpdateNoteRequest {
    #[serde(default)]
    content: Patch<String>,
}

async fn list_notes(
    State(state): State<NotesState>,
    ApiAuth(user): ApiAuth,
    ApiQuery(query): ApiQuery<ListNotesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let notebook_id = query.notebook_id.filter(|id| !id.is_empty());

    let notes = state
        .db
        .notes()
        .list_by_user(&user.id, notebook_id.as_deref())
        .await
        .db_err("Failed to list notes")?;

    Ok(Json(notes))
}

async fn create_note(
    State(state): State<NotesState>,
    ApiAuth(user): ApiAuth,
    ApiJson(payload): ApiJson<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(notebook_id), Some(content)) = (payload.notebook_id, payload.content) else {
        return Err(ApiError::bad_request("missing fields"));
    };
    if is_blank(Some(&notebook_id)) || is_blank(Some(&content)) {
        return Err(ApiError::bad_request("missing fields"));
    }

    // Unknown and foreign notebooks look the same to the caller
    state
        .db
        .notebooks()
        .get_owned(&notebook_id, &user.id)
        .await
        .db_err("Failed to get notebook")?
        .ok_or_else(|| ApiError::forbidden("notebook not found"))?;

    let note = state
        .db
        .notes()
        .create(&user.id, &notebook_id, &content)
        .await
        .db_err("Failed to create note")?;

    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(state): State<NotesState>,
    ApiAuth(user): ApiAuth,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .notes()
        .get_owned(&id, &user.id)
        .await
        .db_err("Failed to get note")?
        .ok_or_else(|| ApiError::not_found("note not found"))?;

    let content = match payload.content {
        Patch::Missing => None,
        Patch::Value(content) if !is_blank(Some(&content)) => Some(content),
        Patch::Null | Patch::Value(_) => return Err(ApiError::bad_request("missing fields")),
    };

    let note = state
        .db
        .notes()
        .update(&id, &user.id, content.as_deref())
        .await
        .db_err("Failed to update note")?
        .ok_or_else(|| ApiError::not_found("note not found"))?;

    Ok(Json(note))
}
