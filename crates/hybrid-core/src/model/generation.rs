//! Generation parameters shared by the local engine and the execution
//! manager's presets.

use serde::{Deserialize, Serialize};

/// Sampling parameters for a single generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum tokens to generate.
    pub max_tokens: usize,
    /// Sampling temperature, `[0, 1]`.
    pub temperature: f32,
    /// Nucleus sampling threshold, `(0, 1]`.
    pub top_p: f32,
}

impl GenerationParams {
    /// Low temperature, tight nucleus: favors deterministic, literal
    /// output.
    #[must_use]
    pub fn conservative() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.2,
            top_p: 0.8,
        }
    }

    /// A reasonable default for general-purpose use.
    #[must_use]
    pub fn balanced() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.7,
            top_p: 0.95,
        }
    }

    /// High temperature, wide nucleus: favors varied, exploratory output.
    #[must_use]
    pub fn creative() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 1.0,
            top_p: 1.0,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::balanced()
    }
}
