//! Local engine error taxonomy.

use thiserror::Error;

/// Errors the local engine facade can surface.
#[derive(Debug, Error)]
pub enum LocalEngineError {
    /// `load` rejected because `available_vram < estimated_memory + safety
    /// margin`.
    #[error("insufficient memory: need {required} bytes, have {available} available")]
    InsufficientMemory {
        /// Estimated bytes required, including the safety margin.
        required: u64,
        /// Bytes actually available.
        available: u64,
    },

    /// The load was cancelled before it could complete validation.
    #[error("validation cancelled")]
    ValidationCancelled,

    /// The model directory did not contain a recognizable model format.
    #[error("invalid model format: {0}")]
    InvalidFormat(String),

    /// `generate` was called while the engine was not in the `loaded`
    /// state.
    #[error("no model loaded")]
    ModelNotLoaded,

    /// The model directory could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for local engine operations.
pub type LocalResult<T> = Result<T, LocalEngineError>;
