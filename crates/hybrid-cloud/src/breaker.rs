//! Per-host circuit breaker.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// The breaker's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Closed,
    Open { until: Instant },
    HalfOpen,
}

struct Inner {
    state: State,
    failure_count: u32,
    in_flight_probe: bool,
}

/// A circuit breaker guarding calls to a single upstream host.
///
/// `closed -> (N failures) -> open(until) -> (time elapsed) -> half_open
/// -> (probe success) -> closed`, and `half_open -> (probe failure) ->
/// open(new until)`.
pub struct CircuitBreaker {
    failure_threshold: u32,
    cooldown: Duration,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Build a breaker with the given failure threshold and cooldown.
    #[must_use]
    pub fn new(failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            cooldown,
            inner: Mutex::new(Inner {
                state: State::Closed,
                failure_count: 0,
                in_flight_probe: false,
            }),
        }
    }

    /// A breaker with the default knobs: `failure_threshold = 3`,
    /// `cooldown = 60s`.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(3, Duration::from_secs(60))
    }

    /// Whether a call may be attempted right now.
    ///
    /// In `closed`, always true. In `open(until)`, true iff the cooldown
    /// has elapsed, and that observation transitions the breaker to
    /// `half_open`. In `half_open`, true iff no probe is already in
    /// flight; taking the slot marks a probe as in flight so at most one
    /// caller observes `true` per cooldown window.
    pub async fn can_execute(&self) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.state {
            State::Closed => true,
            State::Open { until } => {
                if Instant::now() >= until {
                    inner.state = State::HalfOpen;
                    inner.in_flight_probe = true;
                    true
                } else {
                    false
                }
            }
            State::HalfOpen => {
                if inner.in_flight_probe {
                    false
                } else {
                    inner.in_flight_probe = true;
                    true
                }
            }
        }
    }

    /// Record a successful call: resets to `closed`, zeroes the failure
    /// count, clears the in-flight probe flag.
    pub async fn record_success(&self) {
        let mut inner = self.inner.lock().await;
        inner.state = State::Closed;
        inner.failure_count = 0;
        inner.in_flight_probe = false;
    }

    /// Record a failed call. In `closed`, increments the failure count and
    /// opens the breaker on crossing the threshold. In `half_open`, a
    /// failure immediately re-opens the breaker with a fresh cooldown.
    pub async fn record_failure(&self) {
        let mut inner = self.inner.lock().await;
        match inner.state {
            State::Closed => {
                inner.failure_count = inner.failure_count.saturating_add(1).min(self.failure_threshold);
                if inner.failure_count >= self.failure_threshold {
                    inner.state = State::Open {
                        until: Instant::now() + self.cooldown,
                    };
                }
            }
            State::HalfOpen | State::Open { .. } => {
                inner.state = State::Open {
                    until: Instant::now() + self.cooldown,
                };
                inner.in_flight_probe = false;
            }
        }
    }

    /// Current failure count, bounded by `failure_threshold`.
    pub async fn failure_count(&self) -> u32 {
        self.inner.lock().await.failure_count
    }

    /// Whether the breaker is currently in the `closed` state.
    pub async fn is_closed(&self) -> bool {
        matches!(self.inner.lock().await.state, State::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closed_always_allows_execution() {
        let breaker = CircuitBreaker::with_defaults();
        assert!(breaker.can_execute().await);
        assert!(breaker.can_execute().await);
    }

    #[tokio::test]
    async fn opens_after_threshold_failures() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(60));
        breaker.record_failure().await;
        breaker.record_failure().await;
        assert!(breaker.is_closed().await);
        breaker.record_failure().await;
        assert!(!breaker.is_closed().await);
        assert!(!breaker.can_execute().await);
    }

    #[tokio::test]
    async fn failure_count_is_bounded_by_threshold() {
        let breaker = CircuitBreaker::new(2, Duration::from_secs(60));
        for _ in 0..10 {
            breaker.record_failure().await;
        }
        assert_eq!(breaker.failure_count().await, 2);
    }

    #[tokio::test]
    async fn success_resets_everything() {
        let breaker = CircuitBreaker::new(2, Duration::from_secs(60));
        breaker.record_failure().await;
        breaker.record_success().await;
        assert_eq!(breaker.failure_count().await, 0);
        assert!(breaker.is_closed().await);
    }

    #[tokio::test]
    async fn half_open_allows_exactly_one_caller_per_window() {
        let breaker = CircuitBreaker::new(1, Duration::from_millis(10));
        breaker.record_failure().await;
        assert!(!breaker.can_execute().await);
        tokio::time::sleep(Duration::from_millis(15)).await;
        assert!(breaker.can_execute().await);
        // A second concurrent caller finds the probe slot taken.
        assert!(!breaker.can_execute().await);
    }

    #[tokio::test]
    async fn half_open_failure_reopens_with_new_cooldown() {
        let breaker = CircuitBreaker::new(1, Duration::from_millis(10));
        breaker.record_failure().await;
        tokio::time::sleep(Duration::from_millis(15)).await;
        assert!(breaker.can_execute().await);
        breaker.record_failure().await;
        assert!(!breaker.can_execute().await);
    }
}
