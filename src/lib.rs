pub mod api;
pub mod assets;
pub mod auth;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod password;

use api::{create_api_router, not_found};
use assets::{APP_PATH, app_handler};
use axum::{
    Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Method, Request, header},
    response::Redirect,
    routing::get,
};
use db::Database;
use jwt::JwtConfig;
use password::PasswordHasher;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{Span, info_span};

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// HMAC secret for signing access and refresh tokens
    pub jwt_secret: Vec<u8>,
    /// The one browser origin allowed to call the API cross-origin
    pub cors_origin: HeaderValue,
    /// Password hashing cost settings
    pub hasher: PasswordHasher,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::new(&config.jwt_secret));

    let api_router = create_api_router(config.db.clone(), jwt, config.hasher.clone());

    // Browser client (public, pages authenticate their own API calls)
    let app_routes = Router::new()
        .route(APP_PATH, get(app_handler))
        .route(&format!("{}/", APP_PATH), get(app_handler))
        .route(&format!("{}/{{*path}}", APP_PATH), get(app_handler));

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(config.cors_origin.clone()))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Router::new()
        .route("/", get(Redirect::temporary("/health")))
        .merge(api_router)
        .merge(app_routes)
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors),
        )
}

fn make_span(request: &Request<Body>) -> Span {
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
    )
}

/// Run the server on the given listener until `shutdown` resolves.
/// In-flight requests are allowed to finish.
pub async fn run_server<F>(
    config: ServerConfig,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_app(&config);
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, make_service)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Start the server on the given port in a background task. Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
/// Note: For production use, prefer `run_server` directly in main.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> Result<(tokio::task::JoinHandle<()>, SocketAddr), std::io::Error> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        run_server(config, listener, std::future::pending()).await.ok();
    });

    Ok((handle, local_addr))
}
