use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use intake_db::RelayConfig;
use intake_types::api::{DesignRequestInput, SubmitResponse};
use intake_types::validate;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

/// POST /api/requests — validate, store, then attempt the chat notification.
///
/// Validation failures return 400 with no side effects. A storage failure
/// returns a generic 500 and skips the notification. Once the row is written
/// the request succeeds; the notification outcome is only reported.
pub async fn submit_request(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<DesignRequestInput>,
) -> ApiResult<impl IntoResponse> {
    let today = state.clock.today();
    let request = validate(&input, today).map_err(|errors| {
        debug!(%errors, "Rejected design request");
        ApiError::Validation(errors)
    })?;

    // Run blocking DB insert off the async runtime
    let db = state.clone();
    let row = request.clone();
    let id = tokio::task::spawn_blocking(move || db.db.insert_request(&row))
        .await
        .map_err(ApiError::join)??;

    info!(
        request_id = id,
        category = ?request.category(),
        urgent = request.is_urgent,
        "Design request stored"
    );

    let config = load_relay_config(&state).await;
    let notification = state.relay.notify(&request, &config).await;
    info!(request_id = id, notification = %notification, "Notification attempted");

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            id,
            notification_status: notification,
        }),
    ))
}

/// Reads the relay settings. A failure here must not undo a stored request,
/// so it degrades to an empty config.
async fn load_relay_config(state: &AppState) -> RelayConfig {
    let db = state.clone();
    match tokio::task::spawn_blocking(move || db.db.relay_config()).await {
        Ok(Ok(config)) => config,
        Ok(Err(err)) => {
            warn!(error = %err, "Could not read relay settings");
            RelayConfig::default()
        }
        Err(err) => {
            warn!(error = %err, "spawn_blocking join error");
            RelayConfig::default()
        }
    }
}
