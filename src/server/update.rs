use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;
use crate::newsroom::run_cycle;

/// POST /update-content
///
/// The cron-driven entry point. Authorization first, then one generation
/// cycle. The response carries insert counts only; generated content is
/// never echoed back to the caller.
pub async fn update_content(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    if !state.auth.authorize(&headers) {
        return Err(ApiError::Unauthorized);
    }

    let Some(gateway) = &state.gateway else {
        tracing::error!("Content update requested but no generation key is configured");
        return Err(ApiError::NotConfigured);
    };

    let outcome = run_cycle(&state.db, gateway, state.retention_hours, Utc::now()).await?;

    Ok(Json(json!({
        "success": true,
        "inserted": {
            "articles": outcome.articles,
            "alerts": outcome.alerts,
            "tickers": outcome.tickers,
        }
    })))
}
