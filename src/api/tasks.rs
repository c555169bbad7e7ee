//! Study planner tasks API.
//!
//! All endpoints require a bearer access token.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ResultExt, is_blank};
use super::extract::{ApiJson, ApiQuery, Patch};
use crate::auth::ApiAuth;
use crate::db::{Database, TaskUpdate};
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;

/// Storage format for due dates. Fixed width, so text order is time order.
const DUE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Cutoff used when `now + upcoming days` is not representable.
const LATEST_DUE_DATE: &str = "9999-12-31T23:59:59.999Z";

#[derive(Clone)]
pub struct TasksState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

impl_has_auth_backend!(TasksState);

pub fn router(state: TasksState) -> Router {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{id}", patch(update_task).delete(delete_task))
        .with_state(state)
}

/// Parse a client-supplied due date into the stored form.
///
/// Accepts an RFC 3339 timestamp (any offset) or a bare `YYYY-MM-DD`, which
/// means midnight UTC. Returns `None` for anything else.
pub fn parse_due_date(input: &str) -> Option<String> {
    let input = input.trim();
    let instant = match DateTime::parse_from_rfc3339(input) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(_) => NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?
            .and_utc(),
    };
    Some(instant.format(DUE_DATE_FORMAT).to_string())
}

/// Upper bound for `?upcoming=N`. Only positive integers filter.
fn upcoming_cutoff(upcoming: Option<&str>, now: DateTime<Utc>) -> Option<String> {
    let days: i64 = upcoming?.trim().parse().ok()?;
    if days <= 0 {
        return None;
    }
    let cutoff = TimeDelta::try_days(days)
        .and_then(|delta| now.checked_add_signed(delta))
        .filter(|cutoff| cutoff.format("%Y").to_string().len() == 4);
    Some(match cutoff {
        Some(cutoff) => cutoff.format(DUE_DATE_FORMAT).to_string(),
        None => LATEST_DUE_DATE.to_string(),
    })
}

fn due_date_or_reject(input: &str) -> Result<String, ApiError> {
    parse_due_date(input).ok_or_else(|| ApiError::bad_request("invalid dueDate"))
}

#[derive(Deserialize)]
struct ListTasksQuery {
    upcoming: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskRequest {
    title: Option<String>,
    due_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTaskRequest {
    #[serde(default)]
    title: Patch<String>,
    #[serde(default)]
    due_date: Patch<String>,
    #[serde(default)]
    status: Patch<String>,
}

impl UpdateTaskRequest {
    fn into_update(self) -> Result<TaskUpdate, ApiError> {
        let title = match self.title {
            Patch::Missing => None,
            Patch::Value(title) if !is_blank(Some(&title)) => Some(title),
            Patch::Null | Patch::Value(_) => return Err(ApiError::bad_request("title required")),
        };

        let due_date = match self.due_date {
            Patch::Missing => None,
            Patch::Null => Some(None),
            // An empty string clears the date, like null
            Patch::Value(date) if date.is_empty() => Some(None),
            Patch::Value(date) => Some(Some(due_date_or_reject(&date)?)),
        };

        let status = match self.status {
            Patch::Missing => None,
            Patch::Value(status) => Some(status),
            Patch::Null => return Err(ApiError::bad_request("invalid status")),
        };

        Ok(TaskUpdate {
            title,
            due_date,
            status,
        })
    }
}

#[derive(Serialize)]
struct OkResponse {
    ok: bool,
}

async fn list_tasks(
    State(state): State<TasksState>,
    ApiAuth(user): ApiAuth,
    ApiQuery(query): ApiQuery<ListTasksQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let cutoff = upcoming_cutoff(query.upcoming.as_deref(), Utc::now());

    let tasks = state
        .db
        .tasks()
        .list_by_user(&user.id, cutoff.as_deref())
        .await
        .db_err("Failed to list tasks")?;

    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<TasksState>,
    ApiAuth(user): ApiAuth,
    ApiJson(payload): ApiJson<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = payload
        .title
        .filter(|t| !is_blank(Some(t)))
        .ok_or_else(|| ApiError::bad_request("title required"))?;

    let due_date = payload
        .due_date
        .filter(|d| !d.is_empty())
        .map(|d| due_date_or_reject(&d))
        .transpose()?;

    let task = state
        .db
        .tasks()
        .create(&user.id, &title, due_date.as_deref())
        .await
        .db_err("Failed to create task")?;

    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<TasksState>,
    ApiAuth(user): ApiAuth,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .tasks()
        .get_owned(&id, &user.id)
        .await
        .db_err("Failed to get task")?
        .ok_or_else(|| ApiError::not_found("task not found"))?;

    let update = payload.into_update()?;

    let task = state
        .db
        .tasks()
        .update(&id, &user.id, &update)
        .await
        .db_err("Failed to update task")?
        .ok_or_else(|| ApiError::not_found("task not found"))?;

    Ok(Json(task))
}

async fn delete_task(
    State(state): State<TasksState>,
    ApiAuth(user): ApiAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .db
        .tasks()
        .delete(&id, &user.id)
        .await
        .db_err("Failed to delete task")?;

    if !deleted {
        return Err(ApiError::not_found("task not found"));
    }

    Ok(Json(OkResponse { ok: true }))
}
