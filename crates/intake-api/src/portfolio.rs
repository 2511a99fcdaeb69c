use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{info, warn};

use intake_db::models::PortfolioRow;
use intake_types::PortfolioItem;
use intake_types::api::{CreatePortfolioRequest, PortfolioResponse};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

/// GET /api/portfolio — public showcase, newest first.
pub async fn list_portfolio(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_portfolio())
        .await
        .map_err(ApiError::join)??;

    Ok(Json(PortfolioResponse {
        items: rows.into_iter().map(to_item).collect(),
    }))
}

/// POST /api/admin/portfolio
pub async fn create_portfolio_item(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePortfolioRequest>,
) -> ApiResult<impl IntoResponse> {
    let title = req.title.trim().to_string();
    let image_url = req.image_url.trim().to_string();
    let category = req
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    if title.is_empty() {
        return Err(ApiError::BadRequest("Title is required".into()));
    }
    if !is_image_url(&image_url) {
        return Err(ApiError::BadRequest(
            "Image URL must be an http(s) URL or a site-relative path".into(),
        ));
    }

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        db.db.insert_portfolio(&title, &image_url, category.as_deref())
    })
    .await
    .map_err(ApiError::join)??;

    info!(portfolio_id = row.id, "Portfolio item added");
    Ok((StatusCode::CREATED, Json(to_item(row))))
}

/// DELETE /api/admin/portfolio/{id}
pub async fn delete_portfolio_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let db = state.clone();
    let removed = tokio::task::spawn_blocking(move || db.db.delete_portfolio(id))
        .await
        .map_err(ApiError::join)??;

    if !removed {
        return Err(ApiError::NotFound("Portfolio item"));
    }

    info!(portfolio_id = id, "Portfolio item removed");
    Ok(StatusCode::NO_CONTENT)
}

fn is_image_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/')
}

fn to_item(row: PortfolioRow) -> PortfolioItem {
    let created_at = parse_sqlite_timestamp(&row.created_at).unwrap_or_else(|| {
        warn!("Corrupt created_at '{}' on portfolio item {}", row.created_at, row.id);
        DateTime::default()
    });

    PortfolioItem {
        id: row.id,
        title: row.title,
        image_url: row.image_url,
        category: row.category,
        created_at,
    }
}

// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
fn parse_sqlite_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>().ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|ndt| ndt.and_utc())
    })
}
