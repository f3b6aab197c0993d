//! Hybrid Sanitizer - detects and redacts PII before a prompt can cross
//! into a cloud provider.
//!
//! [`sanitize`] is pure and deterministic: identical input yields identical
//! output and an identical violation list, and running it again over its
//! own output is a no-op (the fixed placeholder never matches a pattern).

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod patterns;

use hybrid_core::{PiiViolation, SanitizationResult};

/// The text every redacted span is replaced with. Chosen to be shapeless
/// with respect to every pattern above: no digits, no `@`, no run long
/// enough to register as high-entropy.
const PLACEHOLDER: &str = "[REDACTED]";

/// Detect and redact PII in `text`.
///
/// Empty input returns `was_sanitized = false` with no violations, matching
/// every other pattern's vacuous case.
#[must_use]
#[tracing::instrument(skip(text), fields(input_len = text.len()))]
pub fn sanitize(text: &str) -> SanitizationResult {
    if text.is_empty() {
        return SanitizationResult::clean(String::new());
    }

    let mut matches = patterns::find_all(text);
    matches.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut selected = Vec::new();
    let mut cursor = 0usize;
    for m in matches {
        if m.start < cursor {
            continue;
        }
        selected.push(m);
        cursor = m.end;
    }

    if selected.is_empty() {
        return SanitizationResult::clean(text.to_string());
    }

    let mut sanitized_text = String::with_capacity(text.len());
    let mut violations = Vec::with_capacity(selected.len());
    let mut pos = 0usize;
    for m in &selected {
        sanitized_text.push_str(&text[pos..m.start]);
        sanitized_text.push_str(PLACEHOLDER);
        violations.push(PiiViolation::new(m.pattern, m.start));
        pos = m.end;
    }
    sanitized_text.push_str(&text[pos..]);

    tracing::debug!(violation_count = violations.len(), "redacted PII from prompt");

    SanitizationResult {
        sanitized_text,
        was_sanitized: true,
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_never_sanitized() {
        let result = sanitize("");
        assert!(!result.was_sanitized);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn clean_text_is_untouched() {
        let result = sanitize("what's the weather like today?");
        assert!(!result.was_sanitized);
        assert_eq!(result.sanitized_text, "what's the weather like today?");
    }

    #[test]
    fn redacts_email_without_revealing_it() {
        let result = sanitize("email me at jane.doe@example.com thanks");
        assert!(result.was_sanitized);
        assert!(!result.sanitized_text.contains("jane.doe@example.com"));
        assert!(result.sanitized_text.contains(PLACEHOLDER));
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].pattern, "email");
    }

    #[test]
    fn redacts_multiple_disjoint_violations_in_order() {
        let text = "call 415-555-0199 or email a@b.com";
        let result = sanitize(text);
        assert_eq!(result.violations.len(), 2);
        assert!(result.violations[0].offset < result.violations[1].offset);
    }

    #[test]
    fn overlapping_matches_keep_only_the_longer_one() {
        // The secret-header match spans "api_key: <token>" while the
        // high-entropy match covers only the token; they overlap and the
        // earlier-starting, longer span wins, leaving one violation.
        let text = "api_key: aZ9mK2pQ7xL4vN8rT1wY6bC3dF5gH0j";
        let result = sanitize(text);
        assert!(result.was_sanitized);
        assert!(!result.sanitized_text.contains("aZ9mK2pQ7xL4vN8rT1wY6bC3dF5gH0j"));
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].pattern, "secret_header");
    }

    #[test]
    fn sanitization_is_idempotent() {
        let text = "reach me at jane.doe@example.com or 415-555-0199";
        let once = sanitize(text);
        let twice = sanitize(&once.sanitized_text);
        assert_eq!(once.sanitized_text, twice.sanitized_text);
        assert!(!twice.was_sanitized);
    }

    #[test]
    fn sanitization_is_deterministic() {
        let text = "ssn 123-45-6789";
        let a = sanitize(text);
        let b = sanitize(text);
        assert_eq!(a, b);
    }
}
