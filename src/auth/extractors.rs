//! Axum extractors for authentication.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::bearer::get_bearer_token;
use super::errors::ApiAuthError;
use super::state::HasAuthBackend;
use super::types::AuthenticatedUser;
use crate::jwt::Claims;

/// Turn verified claims into a caller identity. Only plain access tokens qualify.
fn identity_from_claims(claims: Claims) -> Result<AuthenticatedUser, ApiAuthError> {
    if claims.token_type.is_some() {
        return Err(ApiAuthError::InvalidToken);
    }
    let email = claims.email.ok_or(ApiAuthError::InvalidToken)?;
    Ok(AuthenticatedUser {
        id: claims.sub,
        email,
    })
}

/// Extractor for API endpoints that require authentication.
///
/// Reads `Authorization: Bearer <access token>` and verifies it against the
/// state's signing key. Stateless: no database lookup happens here.
pub struct ApiAuth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for ApiAuth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = get_bearer_token(&parts.headers).ok_or(ApiAuthError::NoToken)?;

        let claims = state.jwt().verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            ApiAuthError::InvalidToken
        })?;

        identity_from_claims(claims).map(ApiAuth)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::db::User;
    use crate::impl_has_auth_backend;
    use crate::jwt::JwtConfig;

    #[derive(Clone)]
    struct TestState {
        jwt: Arc<JwtConfig>,
    }

    impl_has_auth_backend!(TestState);

    async fn whoami(ApiAuth(user): ApiAuth) -> String {
        format!("{}|{}", user.id, user.email)
    }

    fn app(jwt: Arc<JwtConfig>) -> Router {
        Router::new()
            .route("/", get(whoami))
            .with_state(TestState { jwt })
    }

    fn user() -> User {
        User {
            id: "u-1".into(),
            email: "a@x.com".into(),
            password_hash: String::new(),
            display_name: "A".into(),
            created_at: String::new(),
        }
    }

    async fn call(jwt: Arc<JwtConfig>, auth: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::builder().uri("/");
        if let Some(value) = auth {
            request = request.header("authorization", value);
        }
        let response = app(jwt)
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_access_token_attaches_identity() {
        let jwt = Arc::new(JwtConfig::new(b"secret"));
        let pair = jwt.issue(&user()).unwrap();

        let (status, body) = call(jwt, Some(&format!("Bearer {}", pair.access_token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "u-1|a@x.com");
    }

    #[tokio::test]
    async fn test_missing_header_is_no_token() {
        let jwt = Arc::new(JwtConfig::new(b"secret"));
        let (status, body) = call(jwt, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"No token"}"#);
    }

    #[tokio::test]
    async fn test_missing_prefix_is_no_token() {
        let jwt = Arc::new(JwtConfig::new(b"secret"));
        let pair = jwt.issue(&user()).unwrap();
        let (status, body) = call(jwt, Some(&pair.access_token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"No token"}"#);
    }

    #[tokio::test]
    async fn test_garbage_token_is_invalid() {
        let jwt = Arc::new(JwtConfig::new(b"secret"));
        let (status, body) = call(jwt, Some("Bearer not-a-jwt")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"Invalid token"}"#);
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let jwt = Arc::new(JwtConfig::new(b"secret"));
        let pair = jwt.issue(&user()).unwrap();
        let (status, body) = call(jwt, Some(&format!("Bearer {}", pair.refresh_token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"Invalid token"}"#);
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_invalid() {
        let pair = JwtConfig::new(b"other").issue(&user()).unwrap();
        let jwt = Arc::new(JwtConfig::new(b"secret"));
        let (status, _) = call(jwt, Some(&format!("Bearer {}", pair.access_token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
