//! Database layer for deviation-dl
//!
//! Handles SQLite persistence for the access token cache so that issued
//! tokens survive process restarts.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] — Database lifecycle, schema migrations
//! - [`tokens`] — Access token rows keyed by client credentials

use sqlx::{FromRow, sqlite::SqlitePool};

mod migrations;
mod tokens;

/// Access token record from database
#[derive(Debug, Clone, FromRow)]
pub struct TokenRow {
    /// Application client id
    pub client_id: String,
    /// SHA-256 hex digest of the client secret
    pub secret_hash: String,
    /// Bearer token value as issued by the token endpoint
    pub access_token: String,
    /// Unix timestamp (milliseconds) when the token was issued
    pub issued_at_ms: i64,
    /// Lifetime of the token in seconds
    pub ttl_secs: i64,
}

/// New access token to be stored
#[derive(Debug, Clone)]
pub struct NewToken<'a> {
    /// Application client id
    pub client_id: &'a str,
    /// SHA-256 hex digest of the client secret
    pub secret_hash: &'a str,
    /// Bearer token value
    pub access_token: &'a str,
    /// Unix timestamp (milliseconds) when the token was issued
    pub issued_at_ms: i64,
    /// Lifetime of the token in seconds
    pub ttl_secs: i64,
}

/// Database handle for deviation-dl
pub struct Database {
    pool: SqlitePool,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
