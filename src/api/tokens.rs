//! Token refresh endpoint.
//!
//! - POST `/refresh` - Exchange a refresh token for a new token pair
//!
//! Tokens are stateless: the old pair stays valid until it expires.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use serde::Deserialize;
use std::sync::Arc;

use super::error::{ApiError, ResultExt};
use super::extract::ApiJson;
use crate::db::Database;
use crate::jwt::{JwtConfig, TokenError};

#[derive(Clone)]
pub struct TokensState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

pub fn router(state: TokensState) -> Router {
    Router::new()
        .route("/refresh", post(refresh_token))
        .with_state(state)
}

#[derive(Deserialize)]
struct RefreshRequest {
    token: Option<String>,
}

/// Verify the refresh token, reload the subject, and issue a pair with full lifetimes.
async fn refresh_token(
    State(state): State<TokensState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = payload
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("no token"))?;

    let claims = state.jwt.verify_refresh(&token).map_err(|e| match e {
        TokenError::InvalidRefresh => ApiError::unauthorized("invalid refresh"),
        _ => ApiError::unauthorized("invalid token"),
    })?;

    let user = state
        .db
        .users()
        .find_by_id(&claims.sub)
        .await
        .db_err("Failed to get user")?
        .ok_or_else(|| ApiError::unauthorized("user not found"))?;

    let tokens = state.jwt.issue(&user).internal_err("Failed to issue tokens")?;

    Ok(Json(tokens))
}
