//! Keeps one circuit breaker per upstream host.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::breaker::CircuitBreaker;

/// A registry handing out one [`CircuitBreaker`] per distinct host key
/// (typically the provider name), lazily constructed on first use.
pub struct CircuitBreakerRegistry {
    breakers: Mutex<HashMap<String, std::sync::Arc<CircuitBreaker>>>,
    failure_threshold: u32,
    cooldown: Duration,
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitBreakerRegistry {
    /// Build an empty registry whose breakers use the default knobs
    /// (`failure_threshold = 3`, `cooldown = 60s`).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(3, Duration::from_secs(60))
    }

    /// Build an empty registry whose breakers all share the given failure
    /// threshold and cooldown, for tests that need a short cooldown to
    /// observe the half-open transition without waiting a full minute.
    #[must_use]
    pub fn with_config(failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            breakers: Mutex::new(HashMap::new()),
            failure_threshold,
            cooldown,
        }
    }

    /// Get or create the breaker for `host_key`.
    pub async fn breaker_for(&self, host_key: &str) -> std::sync::Arc<CircuitBreaker> {
        let mut breakers = self.breakers.lock().await;
        breakers
            .entry(host_key.to_string())
            .or_insert_with(|| std::sync::Arc::new(CircuitBreaker::new(self.failure_threshold, self.cooldown)))
            .clone()
    }
}
