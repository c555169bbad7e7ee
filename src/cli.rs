//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::Database;
use crate::password::{DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, PasswordHasher};
use axum::http::HeaderValue;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Placeholder secret, accepted so a fresh checkout starts without setup.
pub const DEFAULT_JWT_SECRET: &str = "change-this";

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "iremind", about = "Notes, notebooks and a study planner behind token auth")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Secret used to sign tokens
    #[arg(long, env = "JWT_SECRET", default_value = DEFAULT_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: String,

    /// Browser origin allowed to call the API (e.g., "http://localhost:5173")
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:5173")]
    pub cors_origin: String,

    /// Path to SQLite database file
    #[arg(short, long, env = "DATABASE_PATH", default_value = "iremind.db")]
    pub database: String,

    /// Argon2 memory cost in KiB
    #[arg(long, env = "HASH_MEMORY_KIB", default_value_t = DEFAULT_MEMORY_KIB)]
    pub hash_memory_kib: u32,

    /// Argon2 iteration count
    #[arg(long, env = "HASH_ITERATIONS", default_value_t = DEFAULT_ITERATIONS)]
    pub hash_iterations: u32,

    /// Log output format
    #[arg(short, long, env = "LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format. `RUST_LOG` overrides the default level.
pub fn init_logging(format: &LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().with_env_filter(filter).init(),
    }
}

/// Turn the configured secret into signing key bytes. Weak secrets are
/// accepted with a warning.
pub fn load_jwt_secret(secret: &str) -> Vec<u8> {
    if secret == DEFAULT_JWT_SECRET {
        warn!("Using the default JWT secret. Set JWT_SECRET before deploying");
    } else if secret.len() < MIN_JWT_SECRET_LENGTH {
        warn!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
    }
    secret.as_bytes().to_vec()
}

/// Parse the cors-origin URL and reduce it to its origin (`scheme://host[:port]`).
/// Returns None and logs an error if validation fails.
pub fn validate_cors_origin(cors_origin: &str) -> Option<HeaderValue> {
    let url = match Url::parse(cors_origin) {
        Ok(url) => url,
        Err(e) => {
            error!(origin = %cors_origin, error = %e, "Invalid cors-origin URL");
            return None;
        }
    };

    let origin = url.origin();
    if !origin.is_tuple() {
        error!(origin = %cors_origin, "cors-origin must be an http(s) URL with a host");
        return None;
    }

    match HeaderValue::from_str(&origin.ascii_serialization()) {
        Ok(value) => Some(value),
        Err(e) => {
            error!(origin = %cors_origin, error = %e, "cors-origin is not a valid header value");
            None
        }
    }
}

/// Build the password hasher from the cost flags.
/// Returns None and logs an error if argon2 rejects the parameters.
pub fn build_hasher(memory_kib: u32, iterations: u32) -> Option<PasswordHasher> {
    match PasswordHasher::new(memory_kib, iterations, 1) {
        Ok(hasher) => Some(hasher),
        Err(e) => {
            error!(memory_kib, iterations, error = %e, "Invalid password hashing parameters");
            None
        }
    }
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    db: Database,
    jwt_secret: Vec<u8>,
    cors_origin: HeaderValue,
    hasher: PasswordHasher,
) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret,
        cors_origin,
        hasher,
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
