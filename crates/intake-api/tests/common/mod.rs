//! Shared helpers for the HTTP-level integration tests.
//!
//! Requests go straight into the router through `tower::ServiceExt::oneshot`,
//! no TCP listener involved.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, header};
use axum::response::Response;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use intake_api::relay::TelegramRelay;
use intake_api::{AppState, AppStateInner, Clock};
use intake_db::Database;
use serde_json::Value;
use tower::ServiceExt;

pub const SESSION_SECRET: &str = "test-session-secret";
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "s3cret-pass";

/// Fixed "today" for every test so deadline rules are deterministic.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

/// State backed by a fresh in-memory database. Without a relay URL the relay
/// points at a closed port, which only matters if settings are configured.
pub fn test_state(relay_base: Option<&str>) -> AppState {
    let db = Database::open_in_memory().unwrap();
    let relay = TelegramRelay::new(Duration::from_millis(500))
        .unwrap()
        .with_base_url(relay_base.unwrap_or("http://127.0.0.1:9"));

    Arc::new(AppStateInner {
        db,
        session_secret: SESSION_SECRET.to_string(),
        relay,
        clock: Clock::Fixed(today()),
    })
}

pub fn build_test_app(state: AppState) -> Router {
    intake_api::router(state)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid Online request due tomorrow.
pub fn online_request() -> Value {
    serde_json::json!({
        "name": "Ada",
        "role": "PM",
        "category": "Online",
        "description": "Launch campaign visuals for spring",
        "deadline": "2026-03-11",
        "media": "Instagram",
        "file_format": "JPG/PNG",
        "is_urgent": false
    })
}

pub fn with(mut base: Value, key: &str, value: Value) -> Value {
    base[key] = value;
    base
}

/// Seeds the admin account and logs in, returning the `name=value` cookie pair.
pub async fn login(app: &Router, state: &AppState) -> String {
    intake_api::auth::seed_admin(&state.db, ADMIN_USER, ADMIN_PASSWORD).unwrap();

    let response = post_json(
        app,
        "/api/admin/login",
        serde_json::json!({ "username": ADMIN_USER, "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), 200);

    session_cookie(&response).expect("login sets the session cookie")
}

pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("intake_session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}
