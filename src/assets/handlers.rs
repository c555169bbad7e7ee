use axum::{extract::Path, response::Response};

use super::embed::WebAssets;
use super::response::{normalize_path, serve_asset};

/// Serve the browser client (public, pages fetch their data with a bearer token)
pub async fn app_handler(path: Option<Path<String>>) -> Response {
    let path = normalize_path(path.as_ref().map(|p| p.as_str()));
    serve_asset::<WebAssets>(&path)
}
