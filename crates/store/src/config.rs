//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `UHSIN_API_BASE_URL` - Remote API base (default: `https://uhsin-store-api.onrender.com/api`)
//! - `UHSIN_API_TOKEN` - Bearer token to seed the session with
//! - `UHSIN_CACHE_DIR` - Directory for the persisted cache (default: `.uhsin`)
//! - `UHSIN_SYNC_INTERVAL_SECS` - Background pull interval (default: 30)
//! - `UHSIN_REMOTE_ENABLED` - Set to `false` to run fully offline (default: true)
//! - `GEMINI_API_KEY` - Enables generated product descriptions
//! - `GEMINI_MODEL` - Model name (default: `gemini-3-flash-preview`)
//! - `GEMINI_ENDPOINT` - API host (default: `https://generativelanguage.googleapis.com`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "https://uhsin-store-api.onrender.com/api";
const DEFAULT_CACHE_DIR: &str = ".uhsin";
const DEFAULT_SYNC_INTERVAL_SECS: &str = "30";
const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Remote REST API base URL
    pub api_base_url: Url,
    /// Optional bearer token for the remote API
    pub api_token: Option<SecretString>,
    /// Directory holding the persisted cache entries
    pub cache_dir: PathBuf,
    /// Interval between background pulls
    pub sync_interval: Duration,
    /// Whether to talk to the remote API at all
    pub remote_enabled: bool,
    /// Product description generator, if configured
    pub description: Option<DescriptionConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Generative description service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct DescriptionConfig {
    /// API key (sent as `x-goog-api-key`)
    pub api_key: SecretString,
    /// Model name
    pub model: String,
    /// API host
    pub endpoint: String,
}

impl std::fmt::Debug for DescriptionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptionConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = Url::parse(&get_env_or_default(
            "UHSIN_API_BASE_URL",
            DEFAULT_API_BASE_URL,
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("UHSIN_API_BASE_URL".to_string(), e.to_string()))?;

        let sync_secs = get_env_or_default("UHSIN_SYNC_INTERVAL_SECS", DEFAULT_SYNC_INTERVAL_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("UHSIN_SYNC_INTERVAL_SECS".to_string(), e.to_string())
            })?;
        if sync_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "UHSIN_SYNC_INTERVAL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let remote_enabled = parse_bool("UHSIN_REMOTE_ENABLED", true)?;

        Ok(Self {
            api_base_url,
            api_token: get_optional_env("UHSIN_API_TOKEN").map(SecretString::from),
            cache_dir: PathBuf::from(get_env_or_default("UHSIN_CACHE_DIR", DEFAULT_CACHE_DIR)),
            sync_interval: Duration::from_secs(sync_secs),
            remote_enabled,
            description: DescriptionConfig::from_env(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }
}

impl DescriptionConfig {
    fn from_env() -> Option<Self> {
        let api_key = get_optional_env("GEMINI_API_KEY")?;
        Some(Self {
            api_key: SecretString::from(api_key),
            model: get_env_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            endpoint: get_env_or_default("GEMINI_ENDPOINT", DEFAULT_GEMINI_ENDPOINT),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a boolean flag (`true/false/1/0/yes/no`).
fn parse_bool(key: &str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {other}"),
        )),
    }
}
