use axum::http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// Header carrying the scheduler's shared secret.
pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

// ============================================================================
// Shared-Secret Authorization
// ============================================================================

/// The secrets the update endpoint accepts. Either slot may be unset; with
/// both unset the endpoint authorizes nobody.
#[derive(Clone, Default)]
pub struct AuthKeys {
    /// Matched against the `x-cron-secret` header.
    pub cron_secret: Option<SecretString>,
    /// Matched against the `Authorization` header, with or without a
    /// `Bearer ` prefix.
    pub internal_api_key: Option<SecretString>,
}

impl AuthKeys {
    /// True when no secret is configured at all.
    pub fn is_empty(&self) -> bool {
        self.cron_secret.is_none() && self.internal_api_key.is_none()
    }

    /// Check a request's headers against the configured secrets.
    ///
    /// Fails closed: missing headers, unconfigured secrets, and non-UTF-8
    /// header values all come back false.
    pub fn authorize(&self, headers: &HeaderMap) -> bool {
        if let (Some(secret), Some(provided)) =
            (&self.cron_secret, header_str(headers, CRON_SECRET_HEADER))
        {
            if digest_eq(provided, secret.expose_secret()) {
                return true;
            }
        }

        if let (Some(key), Some(provided)) =
            (&self.internal_api_key, header_str(headers, "authorization"))
        {
            let token = provided.strip_prefix("Bearer ").unwrap_or(provided);
            if digest_eq(token, key.expose_secret()) {
                return true;
            }
        }

        false
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Compare a provided secret against the expected one by SHA-256 digest.
/// Hashing first fixes the width of the final equality check, so its timing
/// does not vary with how much of the secret the caller guessed.
fn digest_eq(provided: &str, expected: &str) -> bool {
    Sha256::digest(provided.as_bytes()) == Sha256::digest(expected.as_bytes())
}
