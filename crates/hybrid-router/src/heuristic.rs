//! The local complexity heuristic used by `quick_route` and as the fallback
//! whenever a remote classification can't be obtained.

use hybrid_core::{Complexity, Prompt};

/// Prompts at or above this length lean toward a larger model.
const LONG_PROMPT_CHARS: usize = 400;

/// Keywords that, on their own, are treated as a signal for a demanding
/// task regardless of length.
const HIGH_COMPLEXITY_MARKERS: &[&str] = &[
    "refactor", "architecture", "prove", "optimi", "algorithm", "debug this", "step by step",
];

/// Classify a prompt's complexity without any network call: long prompts,
/// or prompts containing a marker phrase, are `High`; everything else is
/// `Low`.
#[must_use]
pub fn heuristic_complexity(prompt: &Prompt) -> Complexity {
    if prompt.char_len() >= LONG_PROMPT_CHARS {
        return Complexity::High;
    }
    let lowered = prompt.as_str().to_lowercase();
    if HIGH_COMPLEXITY_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return Complexity::High;
    }
    Complexity::Low
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_plain_prompt_is_low_complexity() {
        assert_eq!(heuristic_complexity(&Prompt::new("what's the capital of France?")), Complexity::Low);
    }

    #[test]
    fn long_prompt_is_high_complexity() {
        let prompt = Prompt::new("a".repeat(500));
        assert_eq!(heuristic_complexity(&prompt), Complexity::High);
    }

    #[test]
    fn marker_phrase_is_high_complexity_even_when_short() {
        assert_eq!(
            heuristic_complexity(&Prompt::new("please refactor this function")),
            Complexity::High
        );
    }

    #[test]
    fn marker_match_is_case_insensitive() {
        assert_eq!(heuristic_complexity(&Prompt::new("PROVE this theorem")), Complexity::High);
    }
}
