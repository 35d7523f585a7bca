//! Configuration file parser for ~/.config/tidewire/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos. Secrets can
//! also arrive through the environment, which wins over the file.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
///
/// SEC-015: Custom Debug impl masks the three secrets to prevent leakage in
/// logs, error messages, and debug output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind: String,

    /// Base URL of the chat-completion gateway. HTTPS required except for
    /// localhost.
    pub ai_base_url: String,

    /// Model identifier sent with every generation request.
    pub ai_model: String,

    /// Gateway API key (alternative to the TIDEWIRE_AI_KEY env var).
    /// Env var takes precedence over config file.
    pub ai_api_key: Option<String>,

    /// Shared secret for the external scheduler (TIDEWIRE_CRON_SECRET).
    pub cron_secret: Option<String>,

    /// Internal API key accepted in the Authorization header
    /// (TIDEWIRE_INTERNAL_KEY).
    pub internal_api_key: Option<String>,

    /// Articles older than this many hours are deleted each cycle.
    /// Unsigned so a negative window cannot parse at all.
    pub article_retention_hours: u64,

    /// Default number of articles GET /articles returns.
    pub article_page_limit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
            ai_base_url: "https://ai.gateway.lovable.dev".to_string(),
            ai_model: "google/gemini-3-flash-preview".to_string(),
            ai_api_key: None,
            cron_secret: None,
            internal_api_key: None,
            article_retention_hours: 72,
            article_page_limit: 24,
        }
    }
}

/// SEC-015: Mask secrets in Debug output to prevent leakage.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind", &self.bind)
            .field("ai_base_url", &self.ai_base_url)
            .field("ai_model", &self.ai_model)
            .field("ai_api_key", &self.ai_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("cron_secret", &self.cron_secret.as_ref().map(|_| "[REDACTED]"))
            .field(
                "internal_api_key",
                &self.internal_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("article_retention_hours", &self.article_retention_hours)
            .field("article_page_limit", &self.article_page_limit)
            .finish()
    }
}

impl Config {
    /// SEC-014: Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // SEC-014: Check file size before reading to prevent memory exhaustion
        // from a maliciously large or corrupted config file.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {} // Size is within limits, proceed
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "bind",
                "ai_base_url",
                "ai_model",
                "ai_api_key",
                "cron_secret",
                "internal_api_key",
                "article_retention_hours",
                "article_page_limit",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), bind = %config.bind, "Loaded configuration");
        Ok(config)
    }

    /// Overlay environment-supplied secrets onto the file config.
    ///
    /// A set, non-empty env var replaces the corresponding file value; empty
    /// env vars are treated as unset so `TIDEWIRE_AI_KEY=""` cannot blank a
    /// configured key by accident.
    pub fn apply_env_overrides(&mut self) {
        self.overlay_secrets(
            env_secret("TIDEWIRE_AI_KEY"),
            env_secret("TIDEWIRE_CRON_SECRET"),
            env_secret("TIDEWIRE_INTERNAL_KEY"),
        );
    }

    fn overlay_secrets(
        &mut self,
        ai_api_key: Option<String>,
        cron_secret: Option<String>,
        internal_api_key: Option<String>,
    ) {
        if ai_api_key.is_some() {
            self.ai_api_key = ai_api_key;
        }
        if cron_secret.is_some() {
            self.cron_secret = cron_secret;
        }
        if internal_api_key.is_some() {
            self.internal_api_key = internal_api_key;
        }
    }
}

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

// ============================================================================
// Tests
// ============================================================================
