//! Value types shared across every component of the hybrid inference core.
//!
//! All types here are value types: they flow once through the pipeline and
//! are not retained by their callers.

mod cloud;
mod generation;
mod intent;
mod policy;
mod prompt;
mod result;
mod router;
mod stream;
mod system_state;
mod vram;

pub use cloud::{CloudModelTier, CloudProvider};
pub use generation::GenerationParams;
pub use intent::{Complexity, Intent, IntentAnalysis};
pub use policy::{ExecutionPolicy, SecurityPolicy};
pub use prompt::{InferenceIntent, PriorityTier, Prompt};
pub use result::HybridExecutionResult;
pub use router::{ModelClass, RouterDecision};
pub use stream::StreamEvent;
pub use system_state::{BatteryState, SystemState, ThermalState};
pub use vram::{Quantization, VRAMStatus};

/// A single PII redaction violation recorded during sanitization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PiiViolation {
    /// Name of the pattern that matched (e.g. `"email"`, `"ssn"`).
    pub pattern: String,
    /// Byte offset into the original text where the match started.
    pub offset: usize,
}

impl PiiViolation {
    /// Create a new violation record.
    #[must_use]
    pub fn new(pattern: impl Into<String>, offset: usize) -> Self {
        Self {
            pattern: pattern.into(),
            offset,
        }
    }
}

/// Result of running the input sanitizer over a prompt.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SanitizationResult {
    /// Text with every matched PII pattern replaced by a fixed placeholder.
    pub sanitized_text: String,
    /// Whether any redaction occurred.
    pub was_sanitized: bool,
    /// Every pattern match that was redacted, in order of appearance.
    pub violations: Vec<PiiViolation>,
}

impl SanitizationResult {
    /// Build a result for text that needed no redaction.
    #[must_use]
    pub fn clean(text: impl Into<String>) -> Self {
        Self {
            sanitized_text: text.into(),
            was_sanitized: false,
            violations: Vec::new(),
        }
    }
}
