//! Stateless, line-level SSE parsing.
//!
//! Each line is parsed independently of every other; any buffering of
//! partial lines across network chunks is the caller's responsibility.

use hybrid_core::StreamEvent;

/// Parse a single line of an SSE body into at most one [`StreamEvent`].
///
/// - Lines not beginning with `data: ` produce nothing.
/// - `data: [DONE]` produces `Finish("stop")`.
/// - Any other `data: ...` payload is parsed via `parse_payload`; text
///   deltas produce `Text`, terminal frames produce `Finish`, and malformed
///   payloads are skipped rather than surfaced as errors.
pub fn parse_line(line: &str, parse_payload: impl Fn(&str) -> Option<StreamEvent>) -> Option<StreamEvent> {
    let payload = line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:"))?;
    let payload = payload.trim_start();

    if payload == "[DONE]" {
        return Some(StreamEvent::Finish {
            reason: "stop".to_string(),
        });
    }

    parse_payload(payload)
}

/// Accumulates bytes from a streaming HTTP response and yields complete
/// lines as they arrive, without ever holding the whole response in
/// memory. Mirrors the buffering every provider client needs: chunks can
/// split mid-line, so a partial tail is held across calls.
#[derive(Debug, Default)]
pub struct LineBuffer {
    partial: String,
}

impl LineBuffer {
    /// Build an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning every complete line it completes.
    /// The trailing partial line, if any, is retained for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.partial.push_str(&String::from_utf8_lossy(chunk));

        let mut lines = Vec::new();
        while let Some(newline_at) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=newline_at).collect();
            let trimmed = line.trim_end_matches(['\n', '\r']).to_string();
            lines.push(trimmed);
        }
        lines
    }
}
