//! Liveness probe and the catch-all 404.

use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;

use super::error::ApiError;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
}

pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse { ok: true })
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("not found")
}
