use serde::{Deserialize, Serialize};

use crate::models::{NotificationOutcome, PortfolioItem};
use crate::validation::FieldErrors;

// -- Design requests --

/// Raw form payload. Every field is optional on the wire so that missing
/// values surface as field errors instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignRequestInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, alias = "isUrgent")]
    pub is_urgent: bool,

    // Online
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_format: Option<String>,

    // Offline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finishing: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub id: i64,
    pub notification_status: NotificationOutcome,
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

// -- Admin --

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

// -- Portfolio --

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePortfolioRequest {
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PortfolioResponse {
    pub items: Vec<PortfolioItem>,
}

// -- Relay settings --

#[derive(Debug, Serialize, Deserialize)]
pub struct RelaySettingsResponse {
    pub chat_id: Option<String>,
    /// The bot token itself is never echoed back.
    pub bot_token_configured: bool,
}

/// `None` leaves a value untouched; an empty string clears it.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRelaySettingsRequest {
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}
