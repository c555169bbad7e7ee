#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    response::Response,
};
use iremind::{ServerConfig, create_app, db::Database, password::PasswordHasher};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-jwt-secret-that-is-long-enough";
pub const TEST_ORIGIN: &str = "http://localhost:5173";
pub const TEST_PASSWORD: &str = "correct horse battery";

pub fn test_config(db: Database) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: TEST_SECRET.to_vec(),
        cors_origin: HeaderValue::from_static(TEST_ORIGIN),
        // Minimum argon2 cost keeps the suite fast
        hasher: PasswordHasher::new(1024, 1, 1).expect("Invalid hasher params"),
    }
}

pub async fn create_test_app() -> (Router, Database) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let app = create_app(&test_config(db.clone()));
    (app, db)
}

/// Send a request and return the raw response.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

/// Send a literal body and decode the JSON response.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    decode(response).await
}

async fn decode(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Send a request and decode the JSON response body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    decode(request(app, method, uri, token, body).await).await
}

/// Register an account and return the `{user, accessToken, refreshToken}` response.
pub async fn register(app: &Router, email: &str) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": TEST_PASSWORD,
            "display_name": "Test User",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {json}");
    json
}

/// Register an account and return its access token.
pub async fn register_token(app: &Router, email: &str) -> String {
    access_token(&register(app, email).await)
}

pub fn access_token(json: &Value) -> String {
    json["accessToken"].as_str().unwrap().to_string()
}

pub fn refresh_token(json: &Value) -> String {
    json["refreshToken"].as_str().unwrap().to_string()
}
