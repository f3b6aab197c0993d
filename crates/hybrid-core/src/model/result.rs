//! The final, non-streaming result handed back to callers of the execution
//! manager.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::router::RouterDecision;

/// The outcome of a completed `execute` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridExecutionResult {
    /// The generated text.
    pub text: String,
    /// Where the request was ultimately routed (after any fallback).
    pub decision: RouterDecision,
    /// Time spent in sanitization, intent analysis, and routing.
    #[serde(with = "duration_ms")]
    pub routing_time: Duration,
    /// Time spent in the engine generating text.
    #[serde(with = "duration_ms")]
    pub generation_time: Duration,
    /// Wall-clock time for the whole call.
    #[serde(with = "duration_ms")]
    pub total_time: Duration,
    /// Whether the sanitizer redacted anything from the input.
    pub pii_redacted: bool,
    /// Free-form diagnostic metadata (fallback chain, retries consumed,
    /// breaker state transitions observed, and similar).
    pub metadata: HashMap<String, String>,
}

impl HybridExecutionResult {
    /// Whether the recorded durations are internally consistent:
    /// `routing_time + generation_time <= total_time`.
    #[must_use]
    pub fn durations_are_consistent(&self) -> bool {
        self.routing_time + self.generation_time <= self.total_time
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        #[allow(clippy::cast_possible_truncation)]
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
