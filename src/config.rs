//! Configuration types for deviation-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Top-level configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// API endpoints and application credentials
    #[serde(default)]
    pub api: ApiConfig,

    /// Shared retry budget and backoff unit
    #[serde(default)]
    pub retry: RetryConfig,

    /// Access token caching
    #[serde(default)]
    pub token_cache: TokenCacheConfig,

    /// Value sent as `mature_content` on every listing call (default: true)
    #[serde(default)]
    pub mature_content: MatureContent,
}

impl Config {
    /// Check the configuration for values that can never work
    pub fn validate(&self) -> Result<()> {
        if self.api.client_id.trim().is_empty() {
            return Err(Error::Config {
                message: "client id must not be empty".to_string(),
                key: Some("api.client_id".to_string()),
            });
        }
        if self.api.client_secret.trim().is_empty() {
            return Err(Error::Config {
                message: "client secret must not be empty".to_string(),
                key: Some("api.client_secret".to_string()),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config {
                message: "at least one attempt is required".to_string(),
                key: Some("retry.max_attempts".to_string()),
            });
        }
        url::Url::parse(&self.api.api_root).map_err(|e| Error::Config {
            message: format!("invalid API root: {}", e),
            key: Some("api.api_root".to_string()),
        })?;
        url::Url::parse(&self.api.token_url).map_err(|e| Error::Config {
            message: format!("invalid token URL: {}", e),
            key: Some("api.token_url".to_string()),
        })?;
        Ok(())
    }
}

/// Remote API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the OAuth2 REST API
    #[serde(default = "default_api_root")]
    pub api_root: String,

    /// Client-credentials token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Application client id
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Application client secret
    #[serde(default = "default_client_secret")]
    pub client_secret: String,

    /// Value of the `dA-minor-version` header sent with every request
    #[serde(default = "default_minor_version")]
    pub minor_version: String,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User agent for all requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_root: default_api_root(),
            token_url: default_token_url(),
            client_id: default_client_id(),
            client_secret: default_client_secret(),
            minor_version: default_minor_version(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Retry behavior of API calls
///
/// The attempt budget is shared between rate-limited (429) and generic error
/// responses of one logical call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts per logical call before failing (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Duration of one backoff step (default: 1 second)
    #[serde(default = "default_backoff_step", with = "duration_serde")]
    pub backoff_step: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_step: default_backoff_step(),
        }
    }
}

/// Access token cache configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenCacheConfig {
    /// SQLite file backing the cache across restarts (default: "deviation-dl.db")
    ///
    /// Set to `None` (`null` in config files) to keep tokens in memory only.
    #[serde(default = "default_token_cache_path")]
    pub path: Option<PathBuf>,

    /// Lifetime of an issued token (default: 3600 seconds)
    #[serde(default = "default_token_ttl", with = "duration_serde")]
    pub ttl: Duration,
}

impl Default for TokenCacheConfig {
    fn default() -> Self {
        Self {
            path: default_token_cache_path(),
            ttl: default_token_ttl(),
        }
    }
}

/// Mature content filter, configured either as a boolean or a raw string
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatureContent {
    /// Boolean flag, sent as "true" or "false"
    Flag(bool),
    /// Raw value, sent verbatim
    Raw(String),
}

impl MatureContent {
    /// Query parameter value for `mature_content`
    pub fn as_param(&self) -> String {
        match self {
            MatureContent::Flag(true) => "true".to_string(),
            MatureContent::Flag(false) => "false".to_string(),
            MatureContent::Raw(value) => value.clone(),
        }
    }
}

impl Default for MatureContent {
    fn default() -> Self {
        MatureContent::Flag(true)
    }
}

impl From<bool> for MatureContent {
    fn from(value: bool) -> Self {
        MatureContent::Flag(value)
    }
}

fn default_api_root() -> String {
    "https://www.deviantart.com/api/v1/oauth2".to_string()
}

fn default_token_url() -> String {
    "https://www.deviantart.com/oauth2/token".to_string()
}

fn default_client_id() -> String {
    "5388".to_string()
}

fn default_client_secret() -> String {
    "76b08c69cfb27f26d6161f9ab6d061a1".to_string()
}

fn default_minor_version() -> String {
    "20160316".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    concat!("deviation-dl/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_step() -> Duration {
    Duration::from_secs(1)
}

fn default_token_cache_path() -> Option<PathBuf> {
    Some(PathBuf::from("deviation-dl.db"))
}

fn default_token_ttl() -> Duration {
    Duration::from_secs(3600)
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
