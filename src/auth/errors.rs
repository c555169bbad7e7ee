//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Rejection returned by [`ApiAuth`](super::ApiAuth). Always 401 with a JSON body.
#[derive(Debug, PartialEq, Eq)]
pub enum ApiAuthError {
    /// Missing `Authorization` header or `Bearer ` prefix.
    NoToken,
    /// Bad signature, expired, malformed, or a refresh token.
    InvalidToken,
}

impl ApiAuthError {
    fn message(&self) -> &'static str {
        match self {
            Self::NoToken => "No token",
            Self::InvalidToken => "Invalid token",
        }
    }
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
