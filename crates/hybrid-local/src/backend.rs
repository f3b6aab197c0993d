//! The pluggable inference backend that actually runs generation once a
//! model is loaded. This crate ships only a deterministic stub; a real
//! deployment wires in a concrete backend (llama.cpp, MLX, ONNX Runtime)
//! behind this trait.

use hybrid_core::GenerationParams;

/// Runs generation against an already-loaded model.
#[async_trait::async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Validate that `directory` contains a model this backend can load,
    /// without actually loading it. Used by `list_available_models` and by
    /// `load`'s format check.
    fn validate_format(&self, directory: &std::path::Path) -> bool;

    /// Generate text for `prompt` under `params`.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> String;
}

/// A deterministic stub backend for tests and environments without a real
/// inference runtime configured. Accepts any non-empty directory as valid
/// and echoes the prompt back, truncated to the requested token budget
/// measured in characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubBackend;

#[async_trait::async_trait]
impl InferenceBackend for StubBackend {
    fn validate_format(&self, directory: &std::path::Path) -> bool {
        directory
            .read_dir()
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> String {
        let truncated: String = prompt.chars().take(params.max_tokens).collect();
        format!("[local:{}] {truncated}", params.temperature)
    }
}
