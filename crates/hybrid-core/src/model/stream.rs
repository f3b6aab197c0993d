//! Streaming output events surfaced to callers of the execution manager.

use serde::{Deserialize, Serialize};

/// One increment of a streamed generation.
///
/// This is deliberately narrower than a full provider wire protocol: the
/// execution manager collapses provider-specific streaming shapes (SSE
/// frames, tool-call deltas, usage accounting) down to text, a terminal
/// reason, or an error before handing events to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// An incremental chunk of generated text.
    Text {
        /// The text fragment.
        delta: String,
    },
    /// The stream completed normally.
    Finish {
        /// Why generation stopped (e.g. `"stop"`, `"length"`, `"tool_use"`).
        reason: String,
    },
    /// The stream ended abnormally.
    Error {
        /// A human-readable description of the failure.
        message: String,
    },
}

impl StreamEvent {
    /// Whether this event terminates the stream (`Finish` or `Error`, not
    /// `Text`).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Text { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_events_are_not_terminal() {
        let event = StreamEvent::Text {
            delta: "hi".to_string(),
        };
        assert!(!event.is_terminal());
    }

    #[test]
    fn finish_and_error_are_terminal() {
        assert!(StreamEvent::Finish {
            reason: "stop".to_string()
        }
        .is_terminal());
        assert!(StreamEvent::Error {
            message: "boom".to_string()
        }
        .is_terminal());
    }
}
