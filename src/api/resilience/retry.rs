//! Retry policy with exponential backoff
//!
//! Retries are driven by response status only: a GET or POST answered with
//! one of the configured statuses is re-sent until the retry budget is spent.
//! The caller only ever sees the final response.

use crate::api::config::ClientConfig;
use crate::api::constants::{self, methods};
use log::{debug, warn};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub backoff_factor: Duration,
    pub max_backoff: Duration,
    pub retry_on_status: Vec<u16>,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: constants::DEFAULT_MAX_RETRIES,
            backoff_factor: Duration::from_millis(constants::DEFAULT_BACKOFF_FACTOR_MS),
            max_backoff: Duration::from_secs(constants::MAX_BACKOFF_SECS),
            retry_on_status: constants::DEFAULT_RETRY_STATUSES.to_vec(),
            jitter: false,
        }
    }
}

impl RetryConfig {
    pub fn from_client_config(config: &ClientConfig) -> Self {
        Self {
            max_retries: config.max_retries(),
            backoff_factor: config.backoff_factor(),
            retry_on_status: config.retry_on_status().to_vec(),
            ..Self::default()
        }
    }

    /// No retries at all
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Status-driven retry policy
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Only GET and POST are ever retried
    pub fn allows_method(method: &str) -> bool {
        method.eq_ignore_ascii_case(methods::GET) || method.eq_ignore_ascii_case(methods::POST)
    }

    /// Whether a response with `status` should be re-sent after `retries_done` retries
    pub fn should_retry(&self, method: &str, status: u16, retries_done: u32) -> bool {
        Self::allows_method(method)
            && retries_done < self.config.max_retries
            && self.config.retry_on_status.contains(&status)
    }

    /// Sleep before retry number `retry_number` (1-based):
    /// `backoff_factor * 2^(n-1)`, capped at `max_backoff`
    pub fn delay_for(&self, retry_number: u32) -> Duration {
        let exponent = retry_number.saturating_sub(1).min(31);
        let mut delay = self
            .config
            .backoff_factor
            .saturating_mul(1u32 << exponent)
            .min(self.config.max_backoff);

        if self.config.jitter {
            let jitter_factor = rand::rng().random_range(0.5..=1.5);
            delay = Duration::from_secs_f64(delay.as_secs_f64() * jitter_factor);
        }

        delay
    }

    /// Run `operation`, re-sending while the returned status is retryable.
    ///
    /// Errors from `operation` are returned as-is without retrying.
    pub async fn execute<F, Fut, T, E, S>(&self, method: &str, operation: F, status_of: S) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        S: Fn(&T) -> u16,
    {
        let mut retries_done = 0;

        loop {
            let response = operation().await?;
            let status = status_of(&response);

            if !self.should_retry(method, status, retries_done) {
                if retries_done > 0 {
                    debug!("{} finished with status {} after {} retries", method, status, retries_done);
                }
                return Ok(response);
            }

            retries_done += 1;
            let delay = self.delay_for(retries_done);
            warn!(
                "{} returned retryable status {} (retry {}/{}), waiting {:?}",
                method, status, retries_done, self.config.max_retries, delay
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
