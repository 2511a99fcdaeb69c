//! Best-effort Telegram notification for newly stored design requests.
//!
//! A single attempt is made per request. Whatever happens here, the request
//! has already been persisted; failures are reported back as a
//! [`NotificationOutcome`] and never as an error.

use std::time::Duration;

use chrono::NaiveDateTime;
use intake_db::RelayConfig;
use intake_types::{Choice, NotificationOutcome, RequestDetails, ValidatedRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Base URL of the Telegram Bot API.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("timeout")]
    Timeout,

    #[error("connection error")]
    Connection(#[source] reqwest::Error),

    /// Non-success status; carries the upstream description when provided.
    #[error("{0}")]
    Rejected(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Deserialize)]
struct TelegramErrorBody {
    description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TelegramRelay {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramRelay {
    pub fn new(timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RelayError::Client)?;

        Ok(Self {
            client,
            base_url: TELEGRAM_API_BASE.to_string(),
        })
    }

    /// Overrides the API base URL (for tests or a self-hosted Bot API server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn notify(&self, req: &ValidatedRequest, config: &RelayConfig) -> NotificationOutcome {
        let Some((token, chat_id)) = config.credentials() else {
            debug!("Relay not configured, skipping notification");
            return NotificationOutcome::NotSent;
        };

        let text = format_message(req, chrono::Local::now().naive_local());

        match self.send(token, chat_id, &text).await {
            Ok(()) => {
                info!("Notification delivered");
                NotificationOutcome::Sent
            }
            Err(err) => {
                warn!(error = %err, "Notification failed");
                NotificationOutcome::Failed(err.to_string())
            }
        }
    }

    async fn send(&self, token: &str, chat_id: &str, text: &str) -> Result<(), RelayError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, token);

        let response = self
            .client
            .post(&url)
            .json(&SendMessage {
                chat_id,
                text,
                parse_mode: "Markdown",
            })
            .send()
            .await
            .map_err(|err| {
                // The URL embeds the bot token; keep it out of errors and logs.
                let err = err.without_url();
                if err.is_timeout() {
                    RelayError::Timeout
                } else {
                    RelayError::Connection(err)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = match response.json::<TelegramErrorBody>().await {
            Ok(body) => body.description,
            Err(err) if err.is_timeout() => return Err(RelayError::Timeout),
            Err(_) => None,
        };
        let description = body
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "unknown error".to_string());

        debug!(%status, "Telegram rejected the message");
        Err(RelayError::Rejected(description))
    }
}

/// Characters with meaning in Telegram's legacy Markdown parse mode.
const MARKDOWN_SPECIAL: &[char] = &['_', '*', '`', '['];

/// Escapes user-supplied text so it renders literally under `parse_mode=Markdown`.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if MARKDOWN_SPECIAL.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Renders the chat message for a stored request.
pub fn format_message(req: &ValidatedRequest, at: NaiveDateTime) -> String {
    let header = if req.is_urgent {
        "🚨 *URGENT DESIGN REQUEST* 🚨\n⚠️ *PRIORITY: HIGH*"
    } else {
        "🚀 *NEW DESIGN REQUEST*"
    };

    let details = match &req.details {
        RequestDetails::Online { media, file_format } => format!(
            "📱 *Media:* {}\n📄 *Format:* {}",
            media.label(),
            file_format.label()
        ),
        RequestDetails::Offline {
            print_media_type,
            size,
            finishing,
        } => format!(
            "🖨️ *Jenis Media:* {}\n📏 *Ukuran:* {}\n✨ *Finishing:* {}",
            print_media_type.label(),
            escape_markdown(size),
            finishing.label()
        ),
    };

    let urgent_mark = if req.is_urgent { " ‼️" } else { "" };

    [
        header.to_string(),
        SEPARATOR.to_string(),
        format!("👤 *Name:* {}", escape_markdown(&req.name)),
        format!("💼 *Role:* {}", escape_markdown(&req.role)),
        format!("🎨 *Type:* {}", req.category().label()),
        details,
        format!("📅 *Deadline:* {}{}", req.deadline.format("%Y-%m-%d"), urgent_mark),
        "📝 *Description:*".to_string(),
        escape_markdown(&req.description),
        SEPARATOR.to_string(),
        format!("⏰ *Timestamp:* {}", at.format("%d/%m/%Y %H:%M:%S")),
    ]
    .join("\n")
}
