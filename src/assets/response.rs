use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

use crate::api::ApiError;

/// Static assets are not content-hashed, so always revalidate
pub const NO_CACHE: &str = "no-cache";

/// Scripts and styles only from our own origin, API calls likewise
pub const CSP: &str = "default-src 'self'; script-src 'self'; style-src 'self'; \
    connect-src 'self'; img-src 'self' data:; frame-ancestors 'none'; base-uri 'none'; \
    form-action 'self'";

/// Get MIME type from file extension. Only supports types we actually serve.
#[inline]
pub fn mime_from_path(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("html") => "text/html; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Serve an embedded file. HTML pages also get the CSP header.
pub fn serve_asset<T: Embed>(path: &str) -> Response {
    let Some(content) = T::get(path) else {
        return ApiError::not_found("not found").into_response();
    };
    let mime = mime_from_path(path);
    let headers = [
        (header::CONTENT_TYPE, mime),
        (header::CACHE_CONTROL, NO_CACHE),
    ];
    if path.ends_with(".html") {
        (headers, [(header::CONTENT_SECURITY_POLICY, CSP)], content.data).into_response()
    } else {
        (headers, content.data).into_response()
    }
}

/// Normalize a path, defaulting to "index.html" if empty, missing or a directory
#[inline]
pub fn normalize_path(path: Option<&str>) -> String {
    match path {
        Some(p) if !p.is_empty() && !p.ends_with('/') => p.to_string(),
        Some(p) if !p.is_empty() => format!("{p}index.html"),
        _ => "index.html".to_string(),
    }
}
