//! Error types for deviation-dl
//!
//! This module provides the error taxonomy of the extraction core:
//! - Authentication failures at the token endpoint (fatal for the whole run)
//! - Missing items, collections and folders (fatal for one extraction target)
//! - Exhausted retry budgets, carrying the last response body
//! - Transport, serialization and token-store failures

use thiserror::Error;

/// Result type alias for deviation-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for deviation-dl
#[derive(Debug, Error)]
pub enum Error {
    /// The token endpoint rejected the client credentials
    #[error("authentication failed (HTTP {status})")]
    Authentication {
        /// HTTP status returned by the token endpoint
        status: u16,
    },

    /// Referenced item, collection or folder does not exist
    #[error("requested {0} could not be found")]
    NotFound(String),

    /// An API call kept failing until the shared retry budget ran out
    #[error("API call to {endpoint} failed with HTTP {status}: {body}")]
    Api {
        /// Endpoint that was called (relative to the API root)
        endpoint: String,
        /// Status code of the last response
        status: u16,
        /// Body of the last response
        body: String,
    },

    /// The given URL does not reference anything this crate can extract
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api.client_id")
        key: Option<String>,
    },

    /// Token store operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLx database error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Token store errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),
}

impl Error {
    /// Returns true if the error only concerns the current extraction target.
    ///
    /// Hosts processing a batch of references keep going after such errors and
    /// abort the batch on everything else.
    pub fn is_target_local(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::Api { .. } | Error::InvalidReference(_)
        )
    }
}
