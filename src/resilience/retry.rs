// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Retry logic with exponential backoff.
//!
//! Backends never retry on their own. Callers opt in with one of these
//! policies, and [`retry_when`] lets them restrict retries to errors that
//! could succeed on a second attempt.
//!
//! # Example
//!
//! ```
//! use movie_search::RetryConfig;
//!
//! // Startup: fail fast on bad config
//! let startup = RetryConfig::startup();
//! assert_eq!(startup.max_retries, Some(5));
//!
//! // Search: one attempt plus the configured extra attempts
//! let search = RetryConfig::search(2);
//! assert_eq!(search.max_retries, Some(3));
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

/// Configuration for connection/operation retry behavior.
///
/// `max_retries` is the total number of attempts; `None` retries forever.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub factor: f64,
    pub max_retries: Option<usize>,
}

impl RetryConfig {
    /// Fast-fail retry for initial startup connection.
    /// Attempts 5 times with exponential backoff, failing after ~5 seconds.
    #[must_use]
    pub fn startup() -> Self {
        Self {
            max_retries: Some(5),
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            factor: 2.0,
        }
    }

    /// Quick retry for individual searches: `extra_attempts` after the first.
    #[must_use]
    pub fn search(extra_attempts: usize) -> Self {
        Self {
            max_retries: Some(extra_attempts.saturating_add(1)),
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            factor: 2.0,
        }
    }

    /// Fast retry for tests (minimal delays)
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            max_retries: Some(3),
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
            factor: 2.0,
        }
    }
}

/// Retry `operation` on every error.
pub async fn retry<F, Fut, T, E>(
    operation_name: &str,
    config: &RetryConfig,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_when(operation_name, config, |_| true, operation).await
}

/// Retry `operation` while `should_retry` accepts the error.
///
/// An error `should_retry` refuses is returned immediately.
pub async fn retry_when<F, Fut, T, E, P>(
    operation_name: &str,
    config: &RetryConfig,
    should_retry: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut delay = config.initial_delay;
    let mut attempt = 0usize;

    loop {
        attempt += 1;
        let err = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(operation = operation_name, attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if !should_retry(&err) {
            return Err(err);
        }
        if config.max_retries.is_some_and(|max| attempt >= max) {
            warn!(operation = operation_name, attempt, error = %err, "Giving up");
            return Err(err);
        }

        warn!(
            operation = operation_name,
            attempt,
            max_attempts = ?config.max_retries,
            error = %err,
            "Attempt failed, retrying in {:?}",
            delay
        );
        sleep(delay).await;
        delay = delay.mul_f64(config.factor).min(config.max_delay);
    }
}
