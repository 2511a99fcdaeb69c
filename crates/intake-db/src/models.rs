//! Database row types, these map directly to SQLite rows.
//! Distinct from intake-types API models to keep the DB layer independent.

pub struct RequestRow {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub category: String,
    pub description: String,
    pub deadline: String,
    pub is_urgent: bool,
    pub media: Option<String>,
    pub file_format: Option<String>,
    pub print_media_type: Option<String>,
    pub size: Option<String>,
    pub finishing: Option<String>,
    pub created_at: String,
}

pub struct PortfolioRow {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    pub category: Option<String>,
    pub created_at: String,
}

pub struct AdminRow {
    pub username: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Snapshot of the relay settings taken right before a notification attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl RelayConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: Some(bot_token.into()),
            chat_id: Some(chat_id.into()),
        }
    }

    /// Both secrets, or `None` if either is missing or blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.bot_token.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let chat_id = self.chat_id.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
        Some((token, chat_id))
    }
}
