use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use super::draft::DraftPayload;

/// Upper bound on any gateway response body. A full cycle payload is a few
/// tens of KB; anything near this limit is misbehavior, not content.
const MAX_RESPONSE_SIZE: usize = 2 * 1024 * 1024; // 2MB

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Upstream rate limit exceeded")]
    RateLimited,
    #[error("Upstream quota exhausted")]
    QuotaExceeded,
    #[error("HTTP error: status {0}")]
    Upstream(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    #[error("Malformed completion envelope: {0}")]
    Envelope(String),
    #[error("Malformed generation payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
}

// ============================================================================
// Completion Envelope
// ============================================================================
//
// The provider wraps the generated JSON in an OpenAI-style chat-completion
// envelope; the payload we care about is a JSON string inside
// choices[0].message.content.

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

// ============================================================================
// Gateway Client
// ============================================================================

/// Client for the chat-completion endpoint that writes each cycle's content.
///
/// One instance lives for the life of the process; `generate` makes exactly
/// one POST per call with no retry and no timeout beyond the HTTP client's
/// defaults. The external scheduler owns the cadence, so a failed cycle just
/// waits for the next invocation.
pub struct ContentGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl ContentGateway {
    /// Build a gateway client for `base_url`.
    ///
    /// SEC-002: enforce HTTPS for the base URL so the bearer key never
    /// travels a plaintext link. HTTP is allowed only for localhost/127.0.0.1
    /// (testing purposes).
    pub fn new(base_url: &str, api_key: SecretString, model: &str) -> Result<Self, GatewayError> {
        if !base_url.starts_with("https://") {
            let is_localhost = base_url.starts_with("http://127.0.0.1")
                || base_url.starts_with("http://localhost");
            if !is_localhost {
                tracing::error!(base_url = %base_url, "Rejecting non-HTTPS base URL (HTTPS required except for localhost)");
                return Err(GatewayError::InsecureBaseUrl);
            }
            tracing::warn!(base_url = %base_url, "Using non-HTTPS gateway base URL (localhost only)");
        }

        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        })
    }

    /// Request one cycle's worth of content.
    ///
    /// Sends the system and user prompts to the chat-completion endpoint with
    /// `response_format: json_object`, then parses the envelope and the JSON
    /// payload embedded in the first choice. The returned payload is still
    /// untrusted; every item must pass validation before it is stored.
    pub async fn generate(&self, system: &str, user: &str) -> Result<DraftPayload, GatewayError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "response_format": { "type": "json_object" },
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The upstream body stays in the server log; callers only ever
            // see the status-derived variant.
            let detail = read_limited_text(response, MAX_RESPONSE_SIZE)
                .await
                .unwrap_or_else(|_| String::from("<unreadable body>"));
            tracing::error!(status = status.as_u16(), body = %detail, "Generation gateway returned an error");

            return Err(match status.as_u16() {
                429 => GatewayError::RateLimited,
                402 => GatewayError::QuotaExceeded,
                code => GatewayError::Upstream(code),
            });
        }

        let text = read_limited_text(response, MAX_RESPONSE_SIZE).await?;

        let completion: ChatCompletion =
            serde_json::from_str(&text).map_err(|e| GatewayError::Envelope(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::Envelope("completion has no choices".to_string()))?;

        Ok(serde_json::from_str(&content)?)
    }
}

/// Read a response body with a hard size cap.
async fn read_limited_text(
    response: reqwest::Response,
    limit: usize,
) -> Result<String, GatewayError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(GatewayError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(GatewayError::Network)?;
        // SEC-003: Use saturating_add to prevent integer overflow in size check
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(GatewayError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| GatewayError::InvalidUtf8)
}
