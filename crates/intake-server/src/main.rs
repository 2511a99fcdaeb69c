mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use intake_api::relay::TelegramRelay;
use intake_api::{AppStateInner, Clock};
use intake_db::Database;
use intake_db::queries::{TELEGRAM_BOT_TOKEN_KEY, TELEGRAM_CHAT_ID_KEY};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intake_server=debug,intake_api=debug,intake_db=info,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Init database
    let db = Database::open(&config.db_path)?;
    seed(&db, &config)?;

    let mut relay = TelegramRelay::new(config.relay_timeout)?;
    if let Some(base) = &config.telegram_api_base {
        relay = relay.with_base_url(base.clone());
    }

    let state = Arc::new(AppStateInner {
        db,
        session_secret: config.session_secret.clone(),
        relay,
        clock: Clock::System,
    });

    let mut app = intake_api::router(state);

    // Serve the built UI for everything the API does not handle
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
        let index = dir.join("index.html");
        app = app.fallback_service(ServeDir::new(dir).not_found_service(ServeFile::new(index)));
    }

    let app = app.layer(cors_layer(&config)?).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Intake server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Writes env-provided secrets into the database so the running service only
/// ever reads them from there.
fn seed(db: &Database, config: &ServerConfig) -> anyhow::Result<()> {
    match &config.admin_password {
        Some(password) => {
            intake_api::auth::seed_admin(db, &config.admin_username, password)?;
        }
        None if db.count_admins()? == 0 => {
            warn!("No admin account exists and INTAKE_ADMIN_PASSWORD is unset; admin pages are unusable");
        }
        None => {}
    }

    if let Some(token) = &config.telegram_bot_token {
        db.set_setting(TELEGRAM_BOT_TOKEN_KEY, token)?;
    }
    if let Some(chat_id) = &config.telegram_chat_id {
        db.set_setting(TELEGRAM_CHAT_ID_KEY, chat_id)?;
    }
    if db.relay_config()?.credentials().is_none() {
        info!("Telegram relay not configured; requests will be stored without notification");
    }

    Ok(())
}

fn cors_layer(config: &ServerConfig) -> anyhow::Result<CorsLayer> {
    let Some(origin) = &config.cors_origin else {
        return Ok(CorsLayer::permissive());
    };

    // Session cookies need credentials, which rules out a wildcard origin
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(HeaderValue::from_str(origin)?))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true))
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
