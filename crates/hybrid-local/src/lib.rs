//! Hybrid Local - holds the at-most-one loaded local model and exposes
//! generation against it.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod backend;
pub mod engine;
pub mod error;
pub mod model_info;
pub mod state;

pub use backend::{InferenceBackend, StubBackend};
pub use engine::{LocalEngineFacade, LocalGenerationResult};
pub use error::{LocalEngineError, LocalResult};
pub use model_info::ModelInfo;
pub use state::EngineState;
