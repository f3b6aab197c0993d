//! The SLA envelope every call runs inside: a timeout, a determinism check,
//! and the bookkeeping they need.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use dashmap::DashMap;

/// Latency, memory, determinism, and version bounds a call must respect.
#[derive(Debug, Clone)]
pub struct SlaEnvelope {
    /// Advisory latency budget in milliseconds (not itself enforced as a
    /// hard cutoff; `timeout_seconds` is the hard cutoff).
    pub max_latency_ms: u64,
    /// Advisory memory budget in megabytes.
    pub max_memory_mb: u64,
    /// Whether identical inputs must produce identical outputs within the
    /// same `version` window.
    pub deterministic: bool,
    /// Hard wall-clock timeout.
    pub timeout_seconds: u64,
    /// The version window determinism checks are scoped to.
    pub version: String,
}

impl Default for SlaEnvelope {
    fn default() -> Self {
        Self {
            max_latency_ms: 30_000,
            max_memory_mb: 8_192,
            deterministic: false,
            timeout_seconds: 60,
            version: "1".to_string(),
        }
    }
}

impl SlaEnvelope {
    /// The hard timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Deterministic hash of the input material used to key the determinism
/// check: `(prompt, use_intent_analysis, force_local, force_cloud)`.
#[must_use]
pub fn input_fingerprint(prompt: &str, use_intent_analysis: bool, force_local: bool, force_cloud: bool) -> u64 {
    let mut hasher = DefaultHasher::new();
    prompt.hash(&mut hasher);
    use_intent_analysis.hash(&mut hasher);
    force_local.hash(&mut hasher);
    force_cloud.hash(&mut hasher);
    hasher.finish()
}

/// A fingerprint of an output, used to detect a determinism violation.
#[must_use]
pub fn output_fingerprint(text: &str) -> String {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Tracks, per `(input_fingerprint, version)`, the output fingerprint a
/// prior call produced, so a deterministic SLA can detect a violation.
#[derive(Default)]
pub struct DeterminismLedger {
    seen: DashMap<(u64, String), String>,
}

impl DeterminismLedger {
    /// Build an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `output` for `(input, version)`. Returns the prior
    /// fingerprint, if any, so the caller can compare.
    pub fn record(&self, input: u64, version: &str, output: &str) -> Option<String> {
        let key = (input, version.to_string());
        let fingerprint = output_fingerprint(output);
        self.seen.insert(key, fingerprint.clone())
    }
}
