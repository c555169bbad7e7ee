//! Embedded browser client, served under `/app`.

mod embed;
mod handlers;
mod response;

pub use embed::WebAssets;
pub use handlers::app_handler;
pub use response::mime_from_path;

/// Mount point of the browser client.
pub const APP_PATH: &str = "/app";
