use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;
use crate::storage::{Alert, Article, TickerMessage};

// ============================================================================
// Response Shapes
// ============================================================================
//
// Read endpoints serve timestamps as RFC 3339 strings rather than raw unix
// seconds so browser clients can feed them straight to a date parser.

#[derive(Debug, Deserialize)]
pub struct ArticlesQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub published_at: String,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            excerpt: article.excerpt,
            content: article.content,
            category: article.category,
            published_at: rfc3339(article.published_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub id: i64,
    pub message: String,
    pub severity: String,
    pub active: bool,
    pub created_at: String,
}

impl From<Alert> for AlertResponse {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            message: alert.message,
            severity: alert.severity,
            active: alert.active,
            created_at: rfc3339(alert.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TickerResponse {
    pub id: i64,
    pub label: String,
    pub message: String,
    pub active: bool,
    pub created_at: String,
}

impl From<TickerMessage> for TickerResponse {
    fn from(ticker: TickerMessage) -> Self {
        Self {
            id: ticker.id,
            label: ticker.label,
            message: ticker.message,
            active: ticker.active,
            created_at: rfc3339(ticker.created_at),
        }
    }
}

/// Stored timestamps are our own inserts, always in range; an out-of-range
/// value renders as the epoch rather than failing the whole response.
fn rfc3339(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .unwrap_or_default()
        .to_rfc3339()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /articles?limit=N
pub async fn articles(
    State(state): State<AppState>,
    Query(query): Query<ArticlesQuery>,
) -> Result<Json<Vec<ArticleResponse>>, ApiError> {
    // An unsigned default past i64 pins, then clamps in recent_articles
    // like any caller-supplied limit
    let default = i64::try_from(state.article_page_limit).unwrap_or(i64::MAX);
    let limit = query.limit.unwrap_or(default);
    let rows = state.db.recent_articles(limit).await.map_err(storage_error)?;
    Ok(Json(rows.into_iter().map(ArticleResponse::from).collect()))
}

/// GET /alerts
pub async fn alerts(State(state): State<AppState>) -> Result<Json<Vec<AlertResponse>>, ApiError> {
    let rows = state.db.active_alerts().await.map_err(storage_error)?;
    Ok(Json(rows.into_iter().map(AlertResponse::from).collect()))
}

/// GET /tickers
pub async fn tickers(State(state): State<AppState>) -> Result<Json<Vec<TickerResponse>>, ApiError> {
    let rows = state.db.active_tickers().await.map_err(storage_error)?;
    Ok(Json(rows.into_iter().map(TickerResponse::from).collect()))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn storage_error(error: anyhow::Error) -> ApiError {
    tracing::error!(%error, "Storage query failed");
    ApiError::Storage
}
