use axum::{Json, extract::State, response::IntoResponse};
use tracing::info;

use intake_db::RelayConfig;
use intake_db::queries::{TELEGRAM_BOT_TOKEN_KEY, TELEGRAM_CHAT_ID_KEY};
use intake_types::api::{RelaySettingsResponse, UpdateRelaySettingsRequest};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

/// GET /api/admin/settings
pub async fn get_relay_settings(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let db = state.clone();
    let config = tokio::task::spawn_blocking(move || db.db.relay_config())
        .await
        .map_err(ApiError::join)??;

    Ok(Json(to_response(&config)))
}

/// PUT /api/admin/settings — omitted fields stay as they are, empty strings
/// clear them.
pub async fn update_relay_settings(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateRelaySettingsRequest>,
) -> ApiResult<impl IntoResponse> {
    let db = state.clone();
    let config = tokio::task::spawn_blocking(move || {
        if let Some(token) = &req.bot_token {
            db.db.set_setting(TELEGRAM_BOT_TOKEN_KEY, token)?;
        }
        if let Some(chat_id) = &req.chat_id {
            db.db.set_setting(TELEGRAM_CHAT_ID_KEY, chat_id)?;
        }
        db.db.relay_config()
    })
    .await
    .map_err(ApiError::join)??;

    info!(
        configured = config.credentials().is_some(),
        "Relay settings updated"
    );
    Ok(Json(to_response(&config)))
}

fn to_response(config: &RelayConfig) -> RelaySettingsResponse {
    RelaySettingsResponse {
        chat_id: config.chat_id.clone(),
        bot_token_configured: config
            .bot_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty()),
    }
}
