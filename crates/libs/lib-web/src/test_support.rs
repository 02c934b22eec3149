//! Router-level test helpers: in-memory database, app, request builders.

use crate::server::{create_router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use lib_auth::{encode_jwt, hash_password};
use lib_core::model::store::models::User;
use lib_core::model::store::{memory_pool, UserRepository};
use lib_core::{Config, DbPool};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-must-be-at-least-32-characters-long!";
pub const TEST_PASSWORD: &str = "CorrectHorse42!";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiration_hours: 24,
    }
}

pub async fn test_state() -> AppState {
    let pool = memory_pool().await.expect("in-memory database");
    AppState::new(pool, test_config())
}

pub async fn test_app() -> (Router, DbPool) {
    let state = test_state().await;
    let pool = state.db.clone();
    (create_router(state, &[]), pool)
}

pub async fn seed_user(pool: &DbPool, email: &str) -> User {
    let hash = hash_password(TEST_PASSWORD).expect("hash");
    UserRepository::create(pool, "Test User", email, &hash).await.expect("seed user")
}

pub fn bearer_for(user_id: i64) -> String {
    let token = encode_jwt(user_id.to_string(), None, TEST_SECRET, 1).expect("token");
    format!("Bearer {token}")
}

/// Request builder with optional JSON body and extra headers.
pub fn request(method: Method, uri: &str, body: Option<Value>, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn request_id_header(&self) -> &str {
        self.headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("x-request-id header")
    }

    pub fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> TestResponse {
    let res = app.clone().oneshot(req).await.expect("infallible router");
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    TestResponse { status, headers, body }
}
