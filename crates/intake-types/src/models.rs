use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A closed set of labelled options offered by the request form.
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Case-insensitive lookup by label, ignoring surrounding whitespace.
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|choice| choice.label().eq_ignore_ascii_case(value))
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|choice| choice.label()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Online,
    Offline,
}

impl Choice for Category {
    const ALL: &'static [Self] = &[Self::Online, Self::Offline];

    fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Offline => "Offline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Media {
    Instagram,
    TikTok,
}

impl Choice for Media {
    const ALL: &'static [Self] = &[Self::Instagram, Self::TikTok];

    fn label(self) -> &'static str {
        match self {
            Self::Instagram => "Instagram",
            Self::TikTok => "TikTok",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    #[serde(rename = "JPG/PNG")]
    JpgPng,
    #[serde(rename = "MP4")]
    Mp4,
}

impl Choice for FileFormat {
    const ALL: &'static [Self] = &[Self::JpgPng, Self::Mp4];

    fn label(self) -> &'static str {
        match self {
            Self::JpgPng => "JPG/PNG",
            Self::Mp4 => "MP4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrintMediaType {
    Poster,
    Banner,
    Brosur,
}

impl Choice for PrintMediaType {
    const ALL: &'static [Self] = &[Self::Poster, Self::Banner, Self::Brosur];

    fn label(self) -> &'static str {
        match self {
            Self::Poster => "Poster",
            Self::Banner => "Banner",
            Self::Brosur => "Brosur",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finishing {
    Glossy,
    Doff,
}

impl Choice for Finishing {
    const ALL: &'static [Self] = &[Self::Glossy, Self::Doff];

    fn label(self) -> &'static str {
        match self {
            Self::Glossy => "Glossy",
            Self::Doff => "Doff",
        }
    }
}

/// Print sizes offered by the form. `size` itself is free-form, these are
/// only suggestions.
pub const SIZE_PRESETS: &[&str] = &["A4", "A3", "60x160cm", "80x200cm", "Custom"];

/// Fields that only exist for one of the two categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestDetails {
    Online {
        media: Media,
        file_format: FileFormat,
    },
    Offline {
        print_media_type: PrintMediaType,
        size: String,
        finishing: Finishing,
    },
}

impl RequestDetails {
    pub fn category(&self) -> Category {
        match self {
            Self::Online { .. } => Category::Online,
            Self::Offline { .. } => Category::Offline,
        }
    }
}

/// A design request that passed every validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub name: String,
    pub role: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub is_urgent: bool,
    pub details: RequestDetails,
}

impl ValidatedRequest {
    pub fn category(&self) -> Category {
        self.details.category()
    }
}

/// Result of the best-effort chat notification. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum NotificationOutcome {
    /// Relay token or destination missing; nothing was sent.
    NotSent,
    Sent,
    Failed(String),
}

impl NotificationOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

impl fmt::Display for NotificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSent => f.write_str("Not configured"),
            Self::Sent => f.write_str("Sent"),
            Self::Failed(reason) => write!(f, "Failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_parse_is_case_insensitive() {
        assert_eq!(Media::parse("tiktok"), Some(Media::TikTok));
        assert_eq!(FileFormat::parse(" jpg/png "), Some(FileFormat::JpgPng));
        assert_eq!(Category::parse("OFFLINE"), Some(Category::Offline));
        assert_eq!(Finishing::parse("Matte"), None);
    }

    #[test]
    fn notification_outcome_wire_format() {
        let sent = serde_json::to_value(NotificationOutcome::Sent).unwrap();
        assert_eq!(sent, serde_json::json!({ "status": "sent" }));

        let not_sent = serde_json::to_value(NotificationOutcome::NotSent).unwrap();
        assert_eq!(not_sent, serde_json::json!({ "status": "not_sent" }));

        let failed = serde_json::to_value(NotificationOutcome::failed("timeout")).unwrap();
        assert_eq!(
            failed,
            serde_json::json!({ "status": "failed", "reason": "timeout" })
        );
    }

    #[test]
    fn notification_outcome_display() {
        assert_eq!(NotificationOutcome::NotSent.to_string(), "Not configured");
        assert_eq!(
            NotificationOutcome::failed("chat not found").to_string(),
            "Failed: chat not found"
        );
    }
}
