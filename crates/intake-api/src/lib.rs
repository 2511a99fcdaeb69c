pub mod auth;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod portfolio;
pub mod relay;
pub mod requests;
pub mod settings;
pub mod state;

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{delete, get, post},
};

pub use error::ApiError;
pub use state::{AppState, AppStateInner, Clock};

/// All HTTP routes. Layers (CORS, tracing, static files) are added by the
/// binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/requests", post(requests::submit_request))
        .route("/api/portfolio", get(portfolio::list_portfolio))
        .route("/api/admin/login", post(auth::login))
        .route("/api/admin/logout", post(auth::logout));

    let admin_routes = Router::new()
        .route("/api/admin/session", get(auth::session))
        .route("/api/admin/portfolio", post(portfolio::create_portfolio_item))
        .route("/api/admin/portfolio/{id}", delete(portfolio::delete_portfolio_item))
        .route(
            "/api/admin/settings",
            get(settings::get_relay_settings).put(settings::update_relay_settings),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
