//! Shared harness for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use eventlocator_api::auth::jwt::{generate_access_token, JwtConfig};
use eventlocator_api::auth::password::hash_password;
use eventlocator_api::config::ServerConfig;
use eventlocator_api::state::AppState;
use eventlocator_core::roles::{ROLE_STAFF, ROLE_USER};
use eventlocator_db::models::user::{CreateUser, User};
use eventlocator_db::repositories::UserRepo;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        password_min_length: 8,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router, with the same middleware stack as
/// `main.rs`, over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
    };
    eventlocator_api::build_app(state, vec!["http://localhost:5173".parse().unwrap()])
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST with no body, for the toggle and moderation endpoints.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status, then return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    json
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

async fn insert_user(pool: &PgPool, username: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn create_user(pool: &PgPool, username: &str) -> User {
    insert_user(pool, username, ROLE_USER).await
}

pub async fn create_staff(pool: &PgPool, username: &str) -> User {
    insert_user(pool, username, ROLE_STAFF).await
}

/// Mint an access token without going through the login endpoint.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt).unwrap()
}

/// A valid create-event body starting `days_ahead` days from now.
pub fn event_body(title: &str, days_ahead: i64) -> Value {
    let start = Utc::now() + Duration::days(days_ahead);
    json!({
        "title": title,
        "description": "An evening of talks and conversation.",
        "start_date": start,
        "end_date": start + Duration::hours(3),
        "location_name": "Community Hall",
        "address": "1 Main St",
        "city": "Berlin",
        "country": "Germany",
        "is_published": true,
    })
}

/// Create an event through the API and return its slug.
pub async fn create_event(app: Router, token: &str, body: Value) -> String {
    let response = post_json_auth(app, "/api/v1/events/new", token, body).await;
    let json = expect_json(response, StatusCode::CREATED).await;
    json["data"]["slug"].as_str().unwrap().to_string()
}
