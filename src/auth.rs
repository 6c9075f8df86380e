//! Access token caching for the client-credentials flow
//!
//! Every API call asks the [`TokenCache`] for an Authorization header. Tokens
//! are looked up in two layers, keyed by the client id and a digest of the
//! client secret:
//! 1. an in-process map
//! 2. the optional SQLite store, so tokens survive restarts
//!
//! A token is reused while it is younger than its TTL (one hour by default);
//! afterwards the next lookup requests a fresh one from the token endpoint.

use crate::config::Config;
use crate::db::{Database, NewToken};
use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Short-lived bearer credential
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
    /// Token value as issued
    pub value: String,
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
    /// How long the token may be used
    pub ttl: Duration,
}

impl AccessToken {
    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.value)
    }

    /// Whether the token may still be used at `now`
    ///
    /// A token issued after `now` (clock skew, or a store written by another
    /// host) is never valid, so its lifetime cannot extend past the real TTL.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (now - self.issued_at).to_std() {
            Ok(age) => age < self.ttl,
            Err(_) => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

type CacheKey = (String, String);

/// Memoizes access tokens per credential pair
pub struct TokenCache {
    http: reqwest::Client,
    token_url: String,
    ttl: Duration,
    memory: Mutex<HashMap<CacheKey, AccessToken>>,
    store: Option<Database>,
}

impl TokenCache {
    /// Create an in-memory cache
    pub fn new(http: reqwest::Client, token_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            ttl,
            memory: Mutex::new(HashMap::new()),
            store: None,
        }
    }

    /// Back the cache with a durable store
    pub fn with_store(mut self, store: Database) -> Self {
        self.store = Some(store);
        self
    }

    /// Build a cache from configuration, opening the token store if one is configured
    pub async fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.api.timeout)
            .user_agent(config.api.user_agent.as_str())
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        let cache = Self::new(http, config.api.token_url.clone(), config.token_cache.ttl);

        match &config.token_cache.path {
            Some(path) => {
                let db = Database::new(path).await?;
                let removed = db
                    .delete_expired_tokens(Utc::now().timestamp_millis())
                    .await?;
                if removed > 0 {
                    debug!(removed, "Dropped expired access tokens");
                }
                Ok(cache.with_store(db))
            }
            None => Ok(cache),
        }
    }

    /// Get a valid token for the credential pair, requesting one if needed
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the token endpoint rejects the
    /// credentials.
    pub async fn get_token(&self, client_id: &str, client_secret: &str) -> Result<AccessToken> {
        let key = (client_id.to_string(), secret_digest(client_secret));
        let now = Utc::now();

        if let Some(token) = self.cached(&key)
            && token.is_valid_at(now)
        {
            return Ok(token);
        }

        if let Some(store) = &self.store
            && let Some(row) = store.get_access_token(&key.0, &key.1).await?
        {
            let token = AccessToken {
                value: row.access_token,
                issued_at: Utc
                    .timestamp_millis_opt(row.issued_at_ms)
                    .single()
                    .unwrap_or(DateTime::<Utc>::MIN_UTC),
                ttl: Duration::from_secs(row.ttl_secs.max(0) as u64),
            };
            if token.is_valid_at(now) {
                debug!(client_id, "Using stored access token");
                self.remember(key, token.clone());
                return Ok(token);
            }
        }

        let token = self.request_token(client_id, client_secret).await?;

        if let Some(store) = &self.store {
            store
                .store_access_token(NewToken {
                    client_id: &key.0,
                    secret_hash: &key.1,
                    access_token: &token.value,
                    issued_at_ms: token.issued_at.timestamp_millis(),
                    ttl_secs: token.ttl.as_secs() as i64,
                })
                .await?;
        }
        self.remember(key, token.clone());

        Ok(token)
    }

    /// Forget any cached token for the credential pair
    pub async fn invalidate(&self, client_id: &str, client_secret: &str) -> Result<()> {
        let key = (client_id.to_string(), secret_digest(client_secret));
        if let Ok(mut memory) = self.memory.lock() {
            memory.remove(&key);
        }
        if let Some(store) = &self.store {
            store.delete_access_token(&key.0, &key.1).await?;
        }
        Ok(())
    }

    /// Close the token store, if any
    pub async fn close(self) {
        if let Some(store) = self.store {
            store.close().await;
        }
    }

    fn cached(&self, key: &CacheKey) -> Option<AccessToken> {
        match self.memory.lock() {
            Ok(memory) => memory.get(key).cloned(),
            Err(_) => {
                warn!("Token cache lock poisoned, ignoring in-memory entry");
                None
            }
        }
    }

    fn remember(&self, key: CacheKey, token: AccessToken) {
        if let Ok(mut memory) = self.memory.lock() {
            memory.insert(key, token);
        }
    }

    async fn request_token(&self, client_id: &str, client_secret: &str) -> Result<AccessToken> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];

        let response = self.http.post(&self.token_url).form(&form).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(status = status.as_u16(), "Token endpoint rejected credentials");
            return Err(Error::Authentication {
                status: status.as_u16(),
            });
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Token endpoint returned an unreadable body");
            Error::Authentication {
                status: status.as_u16(),
            }
        })?;
        let value = body.access_token.ok_or(Error::Authentication {
            status: status.as_u16(),
        })?;

        info!(client_id, "Acquired new access token");
        Ok(AccessToken {
            value,
            issued_at: Utc::now(),
            ttl: self.ttl,
        })
    }
}

/// Hex SHA-256 digest of a client secret
fn secret_digest(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}
