//! The exponential backoff policy shared by the cloud client and anything
//! else that retries a fallible remote call.

use std::time::Duration;

/// An exponential backoff policy with a cap and a bounded retry count.
///
/// `delay(attempt) = min(base * multiplier^attempt, max_delay)`, so
/// `delay(0) == base` exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// The delay before the first retry.
    pub base: Duration,
    /// The multiplier applied per subsequent attempt.
    pub multiplier: f64,
    /// The ceiling no computed delay may exceed.
    pub max_delay: Duration,
    /// The maximum number of retries (not counting the original attempt).
    pub max_retries: u32,
}

impl RetryPolicy {
    /// Construct a policy, rejecting a non-positive multiplier in favor of
    /// the default's `2.0`.
    #[must_use]
    pub fn new(base: Duration, multiplier: f64, max_delay: Duration, max_retries: u32) -> Self {
        let multiplier = if multiplier > 0.0 { multiplier } else { 2.0 };
        Self {
            base,
            multiplier,
            max_delay,
            max_retries,
        }
    }

    /// The delay to wait before attempt number `attempt` (zero-indexed:
    /// `attempt == 0` is the first retry, after the original call failed).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn delay(&self, attempt: u32) -> Duration {
        let scaled = self.base.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let capped = scaled.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped.max(0.0))
    }

    /// Whether the caller should retry after having already made
    /// `attempts_made` attempts (the original call plus any retries so
    /// far).
    #[must_use]
    pub fn should_retry(&self, attempts_made: u32) -> bool {
        attempts_made <= self.max_retries
    }

    /// The default set of HTTP status codes this policy treats as
    /// transient and worth retrying.
    #[must_use]
    pub fn default_retryable_status_codes() -> &'static [u16] {
        &[429, 500, 502, 503, 504]
    }

    /// Whether a given HTTP status code is one this policy retries.
    #[must_use]
    pub fn is_retryable_status(status: u16) -> bool {
        Self::default_retryable_status_codes().contains(&status)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(60),
            max_retries: 3,
        }
    }
}
