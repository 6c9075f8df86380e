//! Client for the platform's OAuth2 REST API
//!
//! [`ApiClient`] executes authenticated GET requests, retries transient
//! failures and exposes cursor pagination as a lazy stream of records.
//!
//! ## Submodules
//!
//! Methods on [`ApiClient`] are organized by concern:
//! - [`endpoints`] — Typed helpers for the individual API endpoints
//! - [`pagination`] — Cursor-driven listing streams
//!
//! ## Retry budget
//!
//! One logical call gets [`RetryConfig::max_attempts`](crate::config::RetryConfig)
//! attempts in total. Rate-limited (429) and other failed responses draw from
//! the same budget; each failure also updates the client's shared
//! [`Backoff`], which delays every later call of this client.

use crate::auth::TokenCache;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::retry::{Backoff, Outcome};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

mod endpoints;
mod pagination;

pub use pagination::PAGE_LIMIT;

/// Query parameters of an API call
pub type Params = Vec<(&'static str, String)>;

/// Header carrying the API minor version
const MINOR_VERSION_HEADER: &str = "da-minor-version";

/// Authenticated, self-throttling API client
pub struct ApiClient {
    http: reqwest::Client,
    api_root: String,
    client_id: String,
    client_secret: String,
    max_attempts: u32,
    mature_content: String,
    backoff: Backoff,
    tokens: Arc<TokenCache>,
}

impl ApiClient {
    /// Create a client sharing the given token cache
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(config: &Config, tokens: Arc<TokenCache>) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let minor_version =
            HeaderValue::from_str(&config.api.minor_version).map_err(|e| Error::Config {
                message: format!("invalid minor version header: {}", e),
                key: Some("api.minor_version".to_string()),
            })?;
        headers.insert(HeaderName::from_static(MINOR_VERSION_HEADER), minor_version);

        let http = reqwest::Client::builder()
            .timeout(config.api.timeout)
            .user_agent(config.api.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_root: config.api.api_root.trim_end_matches('/').to_string(),
            client_id: config.api.client_id.clone(),
            client_secret: config.api.client_secret.clone(),
            max_attempts: config.retry.max_attempts,
            mature_content: config.mature_content.as_param(),
            backoff: Backoff::new(&config.retry),
            tokens,
        })
    }

    /// Create a client with its own token cache built from `config`
    pub async fn from_config(config: &Config) -> Result<Self> {
        let tokens = Arc::new(TokenCache::from_config(config).await?);
        Self::new(config, tokens)
    }

    /// Backoff state shared by all calls of this client
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Token cache used for authentication
    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    /// Value sent as `mature_content` on listing calls
    pub fn mature_content(&self) -> &str {
        &self.mature_content
    }

    /// Call an API endpoint and return its JSON body
    ///
    /// A successful response whose body is not valid JSON yields an empty
    /// object.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`] if no token can be obtained
    /// - [`Error::Api`] with the last response body once the attempt budget is spent
    /// - [`Error::Network`] on transport failures
    pub async fn call(&self, endpoint: &str, params: &[(&'static str, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.api_root, endpoint);
        let mut tries = 1;

        loop {
            self.backoff.wait().await;

            let token = self
                .tokens
                .get_token(&self.client_id, &self.client_secret)
                .await?;
            let response = self
                .http
                .get(&url)
                .header(AUTHORIZATION, token.authorization())
                .query(params)
                .send()
                .await?;

            let status = response.status();
            let outcome = Outcome::from_status(status.as_u16());
            if outcome == Outcome::Success {
                let body = response.text().await?;
                return Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
                    debug!(endpoint, error = %e, "Response is not valid JSON, treating as empty");
                    Value::Object(Map::new())
                }));
            }

            let body = response.text().await.unwrap_or_default();
            self.backoff.record(outcome);
            if outcome == Outcome::RateLimited {
                debug!(
                    endpoint,
                    delay_secs = self.backoff.current().as_secs_f64(),
                    "Rate limited"
                );
            } else {
                debug!(
                    endpoint,
                    status = status.as_u16(),
                    attempt = tries,
                    max_attempts = self.max_attempts,
                    "API call failed"
                );
            }

            tries += 1;
            if tries > self.max_attempts {
                return Err(Error::Api {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                    body,
                });
            }
        }
    }

    /// Fetch a web page without authentication
    ///
    /// Returns the status and body; non-success statuses are not errors.
    pub async fn fetch_page(&self, url: &str) -> Result<(StatusCode, String)> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
