//! HTTP-level tests for the admin session gate, portfolio and relay settings.

mod common;

use axum::http::{Method, StatusCode, header};
use common::{
    ADMIN_PASSWORD, ADMIN_USER, body_json, build_test_app, get, login, post_json, send,
    session_cookie, test_state,
};
use serde_json::json;

#[tokio::test]
async fn health_is_public() {
    let app = build_test_app(test_state(None));
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let state = test_state(None);
    intake_api::auth::seed_admin(&state.db, ADMIN_USER, ADMIN_PASSWORD).unwrap();
    let app = build_test_app(state);

    let response = post_json(
        &app,
        "/api/admin/login",
        json!({ "username": ADMIN_USER, "password": "admin123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&response).is_none());

    let response = post_json(
        &app,
        "/api/admin/login",
        json!({ "username": "root", "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_require_session() {
    let app = build_test_app(test_state(None));

    let response = get(&app, "/api/admin/settings").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        &app,
        "/api/admin/portfolio",
        json!({ "title": "Sneaky", "image_url": "https://example.com/x.png" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Method::DELETE,
        "/api/admin/portfolio/1",
        None,
        Some("intake_session=forged.token.value"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_sets_secure_expiring_session_cookie() {
    let state = test_state(None);
    intake_api::auth::seed_admin(&state.db, ADMIN_USER, ADMIN_PASSWORD).unwrap();
    let app = build_test_app(state);

    let response = post_json(
        &app,
        "/api/admin/login",
        json!({ "username": ADMIN_USER, "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(raw.starts_with("intake_session="));
    assert!(raw.contains("HttpOnly"));
    assert!(raw.contains("SameSite=Strict"));
    assert!(raw.contains("Secure"));
    assert!(raw.contains("Max-Age=43200"));

    let cookie = raw.split(';').next().unwrap().to_string();
    let response = send(&app, Method::GET, "/api/admin/session", None, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], ADMIN_USER);
}

#[tokio::test]
async fn session_signed_with_other_secret_is_rejected() {
    let app = build_test_app(test_state(None));

    let token = intake_api::auth::create_token(
        "some-other-secret",
        ADMIN_USER,
        chrono::Utc::now() + chrono::Duration::hours(1),
    )
    .unwrap();
    let cookie = format!("intake_session={token}");

    let response = send(&app, Method::GET, "/api/admin/session", None, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_cookie() {
    let state = test_state(None);
    let app = build_test_app(state.clone());
    let cookie = login(&app, &state).await;

    let response = send(&app, Method::POST, "/api/admin/logout", None, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cleared.starts_with("intake_session="));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn portfolio_add_list_delete() {
    let state = test_state(None);
    let app = build_test_app(state.clone());
    let cookie = login(&app, &state).await;

    let seeded = body_json(get(&app, "/api/portfolio").await).await["items"]
        .as_array()
        .unwrap()
        .len();

    let response = send(
        &app,
        Method::POST,
        "/api/admin/portfolio",
        Some(json!({
            "title": "Festival Poster",
            "image_url": "https://cdn.example.com/festival.jpg",
            "category": "Print"
        })),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["category"], "Print");

    let items = body_json(get(&app, "/api/portfolio").await).await;
    let items = items["items"].as_array().unwrap();
    assert_eq!(items.len(), seeded + 1);
    assert_eq!(items[0]["title"], "Festival Poster");

    let uri = format!("/api/admin/portfolio/{id}");
    let response = send(&app, Method::DELETE, &uri, None, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::DELETE, &uri, None, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn portfolio_rejects_bad_input() {
    let state = test_state(None);
    let app = build_test_app(state.clone());
    let cookie = login(&app, &state).await;

    let response = send(
        &app,
        Method::POST,
        "/api/admin/portfolio",
        Some(json!({ "title": "  ", "image_url": "https://cdn.example.com/a.jpg" })),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        Method::POST,
        "/api/admin/portfolio",
        Some(json!({ "title": "XSS", "image_url": "javascript:alert(1)" })),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn relay_settings_update_without_echoing_token() {
    let state = test_state(None);
    let app = build_test_app(state.clone());
    let cookie = login(&app, &state).await;

    let response = send(&app, Method::GET, "/api/admin/settings", None, Some(&cookie)).await;
    let json = body_json(response).await;
    assert_eq!(json["bot_token_configured"], false);
    assert!(json["chat_id"].is_null());

    let response = send(
        &app,
        Method::PUT,
        "/api/admin/settings",
        Some(json!({ "bot_token": "123:very-secret", "chat_id": "555" })),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["bot_token_configured"], true);
    assert_eq!(json["chat_id"], "555");
    assert!(!json.to_string().contains("very-secret"));

    let config = state.db.relay_config().unwrap();
    assert_eq!(config.credentials(), Some(("123:very-secret", "555")));

    // Clearing the chat id disables the relay
    let response = send(
        &app,
        Method::PUT,
        "/api/admin/settings",
        Some(json!({ "chat_id": "" })),
        Some(&cookie),
    )
    .await;
    let json = body_json(response).await;
    assert!(json["chat_id"].is_null());
    assert_eq!(json["bot_token_configured"], true);
    assert!(state.db.relay_config().unwrap().credentials().is_none());
}
