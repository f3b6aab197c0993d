//! The local engine's state machine.

use crate::model_info::ModelInfo;

/// `unloaded -> loading(fraction) -> loaded(model_info) -> unloading ->
/// unloaded`. `loading` and `unloading` are cancellable. A failure during
/// `loading` transitions to `failed(message)`, observable until the next
/// explicit action moves the engine back to `unloaded`.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineState {
    /// No model is loaded or being loaded.
    Unloaded,
    /// A model is being loaded; `fraction` is progress in `[0, 1]`.
    Loading {
        /// Load progress, `[0, 1]`.
        fraction: f32,
    },
    /// A model is loaded and ready to generate.
    Loaded {
        /// The loaded model's metadata.
        info: ModelInfo,
    },
    /// The loaded model is being unloaded.
    Unloading,
    /// The last load attempt failed; the next explicit action clears this
    /// back to `unloaded`.
    Failed {
        /// A human-readable description of the failure.
        message: String,
    },
}

impl EngineState {
    /// Whether a model is currently loaded and ready to generate.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// The loaded model's metadata, if any.
    #[must_use]
    pub fn model_info(&self) -> Option<&ModelInfo> {
        match self {
            Self::Loaded { info } => Some(info),
            _ => None,
        }
    }
}
