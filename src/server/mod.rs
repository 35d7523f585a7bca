//! HTTP surface for the Tongass News backend.
//!
//! One write route drives the whole system: `POST /update-content`, called
//! by an external scheduler, runs a generation cycle behind a shared-secret
//! check. The read routes serve stored rows as-is. CORS is wide open by
//! design; the content is public and the write route has its own gate.

mod auth;
mod error;
mod reads;
mod update;

pub use auth::{AuthKeys, CRON_SECRET_HEADER};
pub use error::ApiError;

use axum::{
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::newsroom::ContentGateway;
use crate::storage::Database;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// None when no generation key is configured; the update endpoint then
    /// answers 503 instead of calling out.
    pub gateway: Option<Arc<ContentGateway>>,
    pub auth: AuthKeys,
    /// Articles older than this are deleted each cycle.
    pub retention_hours: u64,
    /// Default `limit` for GET /articles.
    pub article_page_limit: u64,
}

// ============================================================================
// Router
// ============================================================================

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            HeaderName::from_static(CRON_SECRET_HEADER),
        ]);

    Router::new()
        .route("/update-content", post(update::update_content))
        .route("/articles", get(reads::articles))
        .route("/alerts", get(reads::alerts))
        .route("/tickers", get(reads::tickers))
        .route("/health", get(reads::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
