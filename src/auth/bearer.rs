//! Bearer token parsing for the `Authorization` header.

use axum::http::{HeaderMap, header};

/// Scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from `Authorization: Bearer <token>`.
///
/// Returns `None` if the header is missing, not valid UTF-8, uses another scheme,
/// or carries an empty token.
pub fn get_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?;
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(get_bearer_token(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn test_no_header() {
        assert_eq!(get_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_wrong_scheme() {
        assert_eq!(get_bearer_token(&headers_with("Basic dXNlcjpwdw==")), None);
        assert_eq!(get_bearer_token(&headers_with("bearer abc")), None);
        assert_eq!(get_bearer_token(&headers_with("abc.def.ghi")), None);
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(get_bearer_token(&headers_with("Bearer ")), None);
    }
}
