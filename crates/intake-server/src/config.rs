use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};

/// Placeholder session secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub session_secret: String,
    pub admin_username: String,
    pub admin_password: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_base: Option<String>,
    pub relay_timeout: Duration,
    pub static_dir: Option<PathBuf>,
    pub cors_origin: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        // Unset and blank are the same thing
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let session_secret = var("INTAKE_SESSION_SECRET").unwrap_or_default();
        if session_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&session_secret.as_str()) {
            bail!("INTAKE_SESSION_SECRET is unset or still a placeholder");
        }
        if session_secret.len() < MIN_SECRET_LEN {
            bail!("INTAKE_SESSION_SECRET must be at least {MIN_SECRET_LEN} characters");
        }

        let port: u16 = var("INTAKE_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("INTAKE_PORT must be a port number")?;

        let relay_timeout_secs: u64 = var("INTAKE_RELAY_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("INTAKE_RELAY_TIMEOUT_SECS must be a whole number of seconds")?
            .unwrap_or(5);

        Ok(Self {
            host: var("INTAKE_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: var("INTAKE_DB_PATH")
                .unwrap_or_else(|| "design_requests.db".into())
                .into(),
            session_secret,
            admin_username: var("INTAKE_ADMIN_USERNAME").unwrap_or_else(|| "admin".into()),
            admin_password: var("INTAKE_ADMIN_PASSWORD"),
            telegram_bot_token: var("INTAKE_TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: var("INTAKE_TELEGRAM_CHAT_ID"),
            telegram_api_base: var("INTAKE_TELEGRAM_API_BASE"),
            relay_timeout: Duration::from_secs(relay_timeout_secs.max(1)),
            static_dir: var("INTAKE_STATIC_DIR").map(PathBuf::from),
            cors_origin: var("INTAKE_CORS_ORIGIN"),
        })
    }
}
