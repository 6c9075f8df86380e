//! Shared backoff state for API calls
//!
//! One [`Backoff`] is owned by each API client and ties throttling across
//! every endpoint called through it: a burst of rate limiting on one listing
//! slows down all later calls of the same client.
//!
//! The delay is counted in steps of [`RetryConfig::backoff_step`]:
//! - a rate-limited response (HTTP 429) adds one step
//! - any other failed response sets the delay to exactly one step
//! - a successful response leaves the delay untouched
//!
//! # Example
//!
//! ```no_run
//! use deviation_dl::config::RetryConfig;
//! use deviation_dl::retry::Backoff;
//!
//! # async fn example() {
//! let backoff = Backoff::new(&RetryConfig::default());
//! backoff.rate_limited();
//! backoff.wait().await; // sleeps one second
//! # }
//! ```

use crate::config::RetryConfig;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Response classification driving the backoff state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// HTTP 200
    Success,
    /// HTTP 429
    RateLimited,
    /// Any other status
    Failed,
}

impl Outcome {
    /// Classify an HTTP status code
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => Outcome::Success,
            429 => Outcome::RateLimited,
            _ => Outcome::Failed,
        }
    }
}

/// Delay shared by all calls of one client
#[derive(Debug)]
pub struct Backoff {
    steps: AtomicU32,
    step: Duration,
}

impl Backoff {
    /// Create a backoff with no delay
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            steps: AtomicU32::new(0),
            step: config.backoff_step,
        }
    }

    /// Current delay applied before each call
    pub fn current(&self) -> Duration {
        self.step * self.steps.load(Ordering::SeqCst)
    }

    /// Current delay in steps
    pub fn steps(&self) -> u32 {
        self.steps.load(Ordering::SeqCst)
    }

    /// Record a rate-limited response, returning the new number of steps
    pub fn rate_limited(&self) -> u32 {
        self.steps.fetch_add(1, Ordering::SeqCst).saturating_add(1)
    }

    /// Record a failed (non rate-limit) response
    pub fn server_error(&self) {
        self.steps.store(1, Ordering::SeqCst);
    }

    /// Update the state for a classified response
    pub fn record(&self, outcome: Outcome) {
        match outcome {
            Outcome::Success => {}
            Outcome::RateLimited => {
                self.rate_limited();
            }
            Outcome::Failed => self.server_error(),
        }
    }

    /// Sleep for the current delay, if any
    pub async fn wait(&self) {
        let delay = self.current();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn backoff_with_step(step: Duration) -> Backoff {
        Backoff::new(&RetryConfig {
            max_attempts: 3,
            backoff_step: step,
        })
    }

    #[test]
    fn test_starts_without_delay() {
        let backoff = backoff_with_step(Duration::from_secs(1));
        assert_eq!(backoff.steps(), 0);
        assert_eq!(backoff.current(), Duration::ZERO);
    }

    #[test]
    fn test_rate_limit_accumulates() {
        let backoff = backoff_with_step(Duration::from_secs(1));

        assert_eq!(backoff.rate_limited(), 1);
        assert_eq!(backoff.rate_limited(), 2);
        assert_eq!(backoff.rate_limited(), 3);
        assert_eq!(backoff.current(), Duration::from_secs(3));
    }

    #[test]
    fn test_server_error_resets_to_one_step() {
        let backoff = backoff_with_step(Duration::from_secs(1));

        backoff.rate_limited();
        backoff.rate_limited();
        backoff.server_error();
        assert_eq!(backoff.steps(), 1);

        backoff.server_error();
        assert_eq!(backoff.steps(), 1, "repeated errors must not accumulate");
    }

    #[test]
    fn test_success_keeps_delay() {
        let backoff = backoff_with_step(Duration::from_secs(1));

        backoff.record(Outcome::RateLimited);
        backoff.record(Outcome::Success);
        assert_eq!(backoff.steps(), 1);
    }

    #[test]
    fn test_outcome_from_status() {
        assert_eq!(Outcome::from_status(200), Outcome::Success);
        assert_eq!(Outcome::from_status(429), Outcome::RateLimited);
        assert_eq!(Outcome::from_status(500), Outcome::Failed);
        assert_eq!(Outcome::from_status(404), Outcome::Failed);
        assert_eq!(Outcome::from_status(201), Outcome::Failed);
    }

    #[tokio::test]
    async fn test_wait_sleeps_for_current_delay() {
        let backoff = backoff_with_step(Duration::from_millis(20));
        backoff.rate_limited();
        backoff.rate_limited();

        let start = std::time::Instant::now();
        backoff.wait().await;
        let elapsed = start.elapsed();

        // Upper bound is generous to tolerate CI scheduling overhead
        assert!(
            elapsed >= Duration::from_millis(40),
            "should wait at least 40ms, waited {:?}",
            elapsed
        );
        assert!(
            elapsed < Duration::from_secs(2),
            "should not wait too long, waited {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_wait_without_delay_returns_immediately() {
        let backoff = backoff_with_step(Duration::from_secs(10));

        let start = std::time::Instant::now();
        backoff.wait().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
