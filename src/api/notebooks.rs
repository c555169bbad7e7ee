//! Notebooks API.
//!
//! All endpoints require a bearer access token.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::{ApiError, ResultExt, is_blank};
use super::extract::ApiJson;
use crate::auth::ApiAuth;
use crate::db::Database;
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct NotebooksState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

impl_has_auth_backend!(NotebooksState);

pub fn router(state: NotebooksState) -> Router {
    Router::new()
        .route("/", get(list_notebooks).post(create_notebook))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateNotebookRequest {
    title: Option<String>,
}

async fn list_notebooks(
    State(state): State<NotebooksState>,
    ApiAuth(user): ApiAuth,
) -> Result<impl IntoResponse, ApiError> {
    let notebooks = state
        .db
        .notebooks()
        .list_by_user(&user.id)
        .await
        .db_err("Failed to list notebooks")?;

    Ok(Json(notebooks))
}

async fn create_notebook(
    State(state): State<NotebooksState>,
    ApiAuth(user): ApiAuth,
    ApiJson(payload): ApiJson<CreateNotebookRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = payload
        .title
        .filter(|t| !is_blank(Some(t)))
        .ok_or_else(|| ApiError::bad_request("title required"))?;

    let notebook = state
        .db
        .notebooks()
        .create(&user.id, &title)
        .await
        .db_err("Failed to create notebook")?;

    Ok((StatusCode::CREATED, Json(notebook)))
}
