use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::newsroom::GatewayError;

// ============================================================================
// API Errors
// ============================================================================

/// Errors surfaced by the HTTP handlers.
///
/// Every variant maps to a fixed status and a fixed generic message; the
/// caller never sees upstream bodies, storage detail, or anything that
/// narrows down what went wrong inside. The specific cause goes to the
/// server log at the point the variant is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// No recognized shared secret on the request.
    Unauthorized,
    /// The server is missing required configuration (no generation key).
    NotConfigured,
    /// The generation provider rate-limited us.
    RateLimited,
    /// The generation provider is unreachable or failing.
    UpstreamUnavailable,
    /// Generation produced something unusable.
    Internal,
    /// A storage query failed.
    Storage,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "Unauthorized",
            ApiError::NotConfigured => "Service not configured",
            ApiError::RateLimited => "Rate limit exceeded",
            ApiError::UpstreamUnavailable => "Content service unavailable",
            ApiError::Internal => "Content generation failed",
            ApiError::Storage => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        tracing::error!(%error, "Content generation cycle failed");
        match error {
            GatewayError::RateLimited => ApiError::RateLimited,
            GatewayError::QuotaExceeded | GatewayError::Network(_) => ApiError::UpstreamUnavailable,
            GatewayError::Upstream(status) if status >= 500 => ApiError::UpstreamUnavailable,
            // Malformed payloads, oversized responses, and the rest are our
            // problem to debug, not the caller's
            _ => ApiError::Internal,
        }
    }
}
