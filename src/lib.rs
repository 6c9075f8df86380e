//! # deviation-dl
//!
//! Extractor core for DeviantArt galleries, single deviations and favorites.
//!
//! ## Design Philosophy
//!
//! deviation-dl is designed to be:
//! - **Lazy** - Records are fetched page by page as the message stream is polled
//! - **Polite** - One shared backoff per client slows every call after failures
//! - **Library-first** - No downloader or CLI, consumers act on [`Message`]s
//! - **Sensible defaults** - Public client credentials and API settings work out of the box
//!
//! ## Quick Start
//!
//! ```no_run
//! use deviation_dl::{ApiClient, Config, Extractor, Message};
//! use futures::TryStreamExt;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let api = Arc::new(ApiClient::from_config(&config).await?);
//!
//!     let extractor = Extractor::from_url(api, "https://shimoda7.deviantart.com/gallery/")?;
//!     let mut messages = extractor.items();
//!     while let Some(message) = messages.try_next().await? {
//!         match message {
//!             Message::Directory { metadata } => println!("directory: {:?}", metadata.author),
//!             Message::Url { target, .. } => println!("file: {}", target.as_url()),
//!             Message::Version { .. } => {}
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API client
pub mod api;
/// OAuth2 access tokens
pub mod auth;
/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Error types
pub mod error;
/// Extraction runs and record sources
pub mod extractor;
/// Shared backoff for failed API calls
pub mod retry;
/// Core types and messages
pub mod types;
/// Utility functions
pub mod utils;

#[cfg(test)]
mod test_helpers;

// Re-export commonly used types
pub use api::ApiClient;
pub use auth::{AccessToken, TokenCache};
pub use config::{ApiConfig, Config, MatureContent, RetryConfig, TokenCacheConfig};
pub use db::Database;
pub use error::{DatabaseError, Error, Result};
pub use extractor::{Extractor, FolderRef, Source};
pub use types::{Author, Collection, Deviation, FileTarget, Message, Target};
