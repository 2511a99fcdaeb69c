use std::sync::Arc;

use chrono::NaiveDate;
use intake_db::Database;

use crate::relay::TelegramRelay;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub session_secret: String,
    pub relay: TelegramRelay,
    pub clock: Clock,
}

/// Source of "today" for the deadline policy. Always the server's clock in
/// production, never a client-supplied date.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Self::System => chrono::Local::now().date_naive(),
            Self::Fixed(date) => *date,
        }
    }
}
