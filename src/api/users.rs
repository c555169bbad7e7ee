//! Account endpoints.
//!
//! - POST `/register` - Create an account and its default notebook, return a token pair
//! - POST `/login` - Check email + password, return a token pair

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::error::{ApiError, ResultExt, is_blank};
use super::extract::ApiJson;
use crate::db::{CreateUserError, Database, PublicUser};
use crate::jwt::{JwtConfig, TokenPair};
use crate::password::PasswordHasher;

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub hasher: PasswordHasher,
}

pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}

#[derive(Deserialize)]
struct RegisterRequest {
    email: Option<String>,
    password: Option<String>,
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

/// `{user, accessToken, refreshToken}`
#[derive(Serialize)]
struct AuthResponse {
    user: PublicUser,
    #[serde(flatten)]
    tokens: TokenPair,
}

async fn register(
    State(state): State<UsersState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(email), Some(password), Some(display_name)) =
        (payload.email, payload.password, payload.display_name)
    else {
        return Err(ApiError::bad_request("missing fields"));
    };
    if [&email, &password, &display_name]
        .into_iter()
        .any(|v| is_blank(Some(v)))
    {
        return Err(ApiError::bad_request("missing fields"));
    }

    // Checked again on insert; this avoids hashing for a taken email
    let exists = state
        .db
        .users()
        .find_by_email(&email)
        .await
        .db_err("Failed to look up email")?;
    if exists.is_some() {
        return Err(ApiError::conflict("email in use"));
    }

    let password_hash = state
        .hasher
        .hash_blocking(password)
        .await
        .internal_err("Failed to hash password")?;

    let user = match state
        .db
        .users()
        .create(&email, &password_hash, &display_name)
        .await
    {
        Ok(user) => user,
        Err(CreateUserError::EmailTaken) => return Err(ApiError::conflict("email in use")),
        Err(CreateUserError::Database(e)) => return Err(ApiError::db_error("Failed to create user", e)),
    };

    state
        .db
        .notebooks()
        .create_default(&user.id)
        .await
        .db_err("Failed to create default notebook")?;

    let tokens = state.jwt.issue(&user).internal_err("Failed to issue tokens")?;

    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: PublicUser::from(&user),
            tokens,
        }),
    ))
}

async fn login(
    State(state): State<UsersState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(ApiError::bad_request("missing fields"));
    };
    if is_blank(Some(&email)) || password.is_empty() {
        return Err(ApiError::bad_request("missing fields"));
    }

    let user = state
        .db
        .users()
        .find_by_email(&email)
        .await
        .db_err("Failed to look up user")?
        .ok_or_else(|| ApiError::unauthorized("invalid credentials"))?;

    let valid = state
        .hasher
        .verify_blocking(password, user.password_hash.clone())
        .await
        .internal_err("Failed to verify password")?;
    if !valid {
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    let tokens = state.jwt.issue(&user).internal_err("Failed to issue tokens")?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: PublicUser::from(&user),
        tokens,
    }))
}
