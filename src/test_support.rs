//! In-memory application state for tests.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::memory::MemorySessions;
use crate::cache::AppCache;
use crate::config::Config;
use crate::db::memory::{MemoryBookings, MemoryRepository};
use crate::models::OwnerId;
use crate::AppState;

pub const TEST_EMAIL: &str = "dona@salao.test";
pub const TEST_PASSWORD: &str = "festa123";

pub fn memory_state() -> AppState {
    memory_state_with(Arc::new(MemorySessions::default()))
}

pub fn memory_state_with(sessions: Arc<MemorySessions>) -> AppState {
    let config = Config::default();
    let payments = Arc::new(MemoryRepository::default());
    AppState {
        packages: Arc::new(MemoryRepository::default()),
        add_ons: Arc::new(MemoryRepository::default()),
        bookings: Arc::new(MemoryBookings::new(payments.clone())),
        payments,
        sessions,
        cache: AppCache::new(config.catalog_cache_ttl),
        config: Arc::new(config),
    }
}

/// State with one registered user; returns the user's owner id too.
pub async fn state_with_user() -> (AppState, OwnerId) {
    let sessions = Arc::new(MemorySessions::default());
    let owner = sessions.add_user(TEST_EMAIL, TEST_PASSWORD).await;
    (memory_state_with(sessions), owner)
}

/// Send one request through the router and decode the body as JSON
/// (or `Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, method, uri, token, body).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

/// Log in as the test user and return the session token.
pub async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(serde_json::json!({"email": TEST_EMAIL, "password": TEST_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}
