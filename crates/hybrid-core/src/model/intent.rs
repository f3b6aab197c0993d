//! Intent analysis types produced by the router's classification step.

use serde::{Deserialize, Serialize};

/// Coarse complexity bucket assigned to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    /// Suitable for a small local model.
    Low,
    /// Requires a larger model; a routing signal toward cloud.
    High,
}

/// Coarse user-intent classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// A factual question.
    Question,
    /// A coding task.
    Coding,
    /// Creative writing.
    CreativeWriting,
    /// Analytical work over provided material.
    Analysis,
    /// Summarization of provided material.
    Summarization,
    /// Language translation.
    Translation,
    /// Multi-step reasoning.
    Reasoning,
    /// Casual conversation.
    Casual,
    /// Automating a task (tool use, scripting).
    TaskAutomation,
    /// Classification unavailable or not attempted.
    Undefined,
}

/// Result of the router's intent-analysis step.
///
/// Invariant: when this is synthesized from the local heuristic rather than
/// a remote classifier, `confidence <= 0.5` and `intent == Undefined`
/// (enforced by [`IntentAnalysis::heuristic_fallback`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentAnalysis {
    /// Complexity bucket.
    pub complexity: Complexity,
    /// Intent classification.
    pub intent: Intent,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Free-text justification (or `"Fallback"` for the heuristic path).
    pub reasoning: String,
    /// Whether PII was detected while classifying.
    pub pii_detected: bool,
    /// Safety flags raised by the classifier, if any.
    pub safety_flags: Vec<String>,
}

impl IntentAnalysis {
    /// The local-heuristic fallback used whenever a remote analysis cannot
    /// be obtained. Classification never fails the whole route.
    #[must_use]
    pub fn heuristic_fallback(complexity: Complexity) -> Self {
        Self {
            complexity,
            intent: Intent::Undefined,
            confidence: 0.5,
            reasoning: "Fallback".to_string(),
            pii_detected: false,
            safety_flags: Vec::new(),
        }
    }

    /// Whether this analysis came from the local heuristic:
    /// `confidence <= 0.5 && intent == Undefined`.
    #[must_use]
    pub fn is_heuristic(&self) -> bool {
        self.confidence <= 0.5 && self.intent == Intent::Undefined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_fallback_satisfies_invariant() {
        let analysis = IntentAnalysis::heuristic_fallback(Complexity::Low);
        assert!(analysis.confidence <= 0.5);
        assert_eq!(analysis.intent, Intent::Undefined);
        assert!(analysis.is_heuristic());
        assert_eq!(analysis.reasoning, "Fallback");
    }
}
