//! The opaque user prompt and the scheduler-facing inference intent.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque user text. Its only structural property is character length; no
/// component should pattern-match on contents except the sanitizer and the
/// local heuristic complexity classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    text: String,
}

impl Prompt {
    /// Wrap raw user text as a prompt.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Borrow the underlying text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of `char`s in the prompt (not bytes).
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Consume the prompt, returning the owned text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Scheduling priority for an in-flight inference task.
///
/// Totally ordered: `Critical < UserInitiated < Background`. Declaration
/// order matches this so the derived [`Ord`] is the priority order the
/// scheduler relies on for preemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityTier {
    /// Preempts any running `UserInitiated` or `Background` task.
    Critical,
    /// A normal, user-triggered request.
    UserInitiated,
    /// Best-effort background work (e.g. speculative pre-generation).
    Background,
}

/// A unit of work submitted to the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceIntent {
    /// Unique intent identifier.
    pub id: Uuid,
    /// The prompt this intent carries.
    pub prompt: Prompt,
    /// Scheduling priority.
    pub priority_tier: PriorityTier,
    /// Maximum tokens the caller will accept as output.
    pub token_budget: usize,
}

impl InferenceIntent {
    /// Create a new, uniquely-identified intent.
    #[must_use]
    pub fn new(prompt: Prompt, priority_tier: PriorityTier, token_budget: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt,
            priority_tier,
            token_budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ordering_is_total() {
        assert!(PriorityTier::Critical < PriorityTier::UserInitiated);
        assert!(PriorityTier::UserInitiated < PriorityTier::Background);
        assert!(PriorityTier::Critical < PriorityTier::Background);
    }

    #[test]
    fn char_len_counts_characters_not_bytes() {
        // "é" is 2 bytes in UTF-8 but 1 char.
        let prompt = Prompt::new("café");
        assert_eq!(prompt.char_len(), 4);
        assert_eq!(prompt.as_str().len(), 5);
    }
}
