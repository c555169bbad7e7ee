//! JWT token generation and validation.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::db::User;

/// Access token duration: 15 minutes
pub const ACCESS_TOKEN_DURATION_SECS: u64 = 15 * 60;

/// Refresh token duration: 7 days
pub const REFRESH_TOKEN_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Marker carried in the `type` claim. Access tokens carry no marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Refresh,
    /// Any marker this server does not issue.
    #[serde(other)]
    Unknown,
}

/// Claims shared by both token kinds.
///
/// Access tokens are `{sub, email}`, refresh tokens are `{sub, type: "refresh"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl Claims {
    pub fn is_refresh(&self) -> bool {
        self.token_type == Some(TokenType::Refresh)
    }
}

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Errors that can occur during JWT operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to encode token: {0}")]
    Encoding(jsonwebtoken::errors::Error),
    /// Bad signature, expired, or malformed.
    #[error("invalid token: {0}")]
    InvalidToken(jsonwebtoken::errors::Error),
    /// Valid token without the refresh marker.
    #[error("not a refresh token")]
    InvalidRefresh,
    #[error("system time error")]
    TimeError,
}

/// Signing keys derived from the shared secret. Read-only after startup.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

fn unix_now() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| TokenError::TimeError)
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue an access + refresh pair for `user`, both starting now.
    pub fn issue(&self, user: &User) -> Result<TokenPair, TokenError> {
        self.issue_at(user, unix_now()?)
    }

    /// Issue a token pair as if it were created at `now` (Unix seconds).
    pub fn issue_at(&self, user: &User, now: u64) -> Result<TokenPair, TokenError> {
        let access = Claims {
            sub: user.id.clone(),
            email: Some(user.email.clone()),
            token_type: None,
            iat: now,
            exp: now + ACCESS_TOKEN_DURATION_SECS,
        };
        let refresh = Claims {
            sub: user.id.clone(),
            email: None,
            token_type: Some(TokenType::Refresh),
            iat: now,
            exp: now + REFRESH_TOKEN_DURATION_SECS,
        };

        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::default(), claims, &self.encoding_key)
            .map_err(TokenError::Encoding)
    }

    /// Check signature and expiry and decode the payload.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::InvalidToken)
    }

    /// Verify a token and require the refresh marker.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if !claims.is_refresh() {
            return Err(TokenError::InvalidRefresh);
        }
        Ok(claims)
    }
}
