//! The local engine facade.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hybrid_core::{GenerationParams, ModelClass, Quantization};
use hybrid_hal::VramProbe;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::backend::InferenceBackend;
use crate::error::{LocalEngineError, LocalResult};
use crate::model_info::ModelInfo;
use crate::state::EngineState;

/// Safety margin added on top of a model's estimated memory footprint
/// before `load` will proceed.
const SAFETY_MARGIN_BYTES: u64 = 2 * (1 << 30);

/// The result of a local `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalGenerationResult {
    /// The generated text.
    pub text: String,
}

/// Holds the at-most-one loaded local model and exposes generation.
///
/// `load` called while already `loaded` first unloads, preserving the
/// at-most-one-loaded invariant across every call path.
pub struct LocalEngineFacade<V, B> {
    vram: V,
    backend: B,
    state: Arc<RwLock<EngineState>>,
    loading_task: Mutex<Option<JoinHandle<()>>>,
}

impl<V: VramProbe, B: InferenceBackend + Clone + 'static> LocalEngineFacade<V, B> {
    /// Build a facade with the given VRAM probe and inference backend,
    /// starting `unloaded`.
    pub fn new(vram: V, backend: B) -> Self {
        Self {
            vram,
            backend,
            state: Arc::new(RwLock::new(EngineState::Unloaded)),
            loading_task: Mutex::new(None),
        }
    }

    /// The current state.
    pub async fn state(&self) -> EngineState {
        self.state.read().await.clone()
    }

    /// Load a model, first unloading whatever (if anything) is currently
    /// loaded.
    pub async fn load(
        &self,
        model_class: ModelClass,
        directory: PathBuf,
        quantization: Quantization,
    ) -> LocalResult<()> {
        if self.state.read().await.is_loaded() {
            self.unload().await;
        }

        let estimated = hybrid_hal::estimate_model_memory(model_class.parameter_billions(), quantization);
        let required = estimated.saturating_add(SAFETY_MARGIN_BYTES);
        let available = self.vram.status().available_vram;
        if available < required {
            *self.state.write().await = EngineState::Failed {
                message: format!("insufficient memory: need {required}, have {available}"),
            };
            return Err(LocalEngineError::InsufficientMemory { required, available });
        }

        *self.state.write().await = EngineState::Loading { fraction: 0.0 };

        let backend = self.backend.clone();
        let directory_for_task = directory.clone();
        let state = self.state.clone();
        let name = directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        let handle = tokio::spawn(async move {
            *state.write().await = EngineState::Loading { fraction: 0.5 };
            if !backend.validate_format(&directory_for_task) {
                *state.write().await = EngineState::Failed {
                    message: "unrecognized model format".to_string(),
                };
                return;
            }
            *state.write().await = EngineState::Loaded {
                info: ModelInfo {
                    name,
                    class: model_class,
                    quantization,
                    directory: directory_for_task,
                },
            };
        });

        let handle = {
            let mut guard = self.loading_task.lock().await;
            *guard = Some(handle);
            guard.take().expect("just inserted")
        };
        if handle.await.is_err() {
            warn!("load task was cancelled or panicked");
            *self.state.write().await = EngineState::Unloaded;
            return Err(LocalEngineError::ValidationCancelled);
        }

        match self.state.read().await.clone() {
            EngineState::Loaded { .. } => Ok(()),
            EngineState::Failed { message } => Err(LocalEngineError::InvalidFormat(message)),
            _ => Err(LocalEngineError::ValidationCancelled),
        }
    }

    /// Unload the current model, if any. Idempotent: calling this while
    /// already `unloaded` is a no-op. Cancels any in-progress load.
    pub async fn unload(&self) {
        if let Some(handle) = self.loading_task.lock().await.take() {
            handle.abort();
        }
        let mut state = self.state.write().await;
        if matches!(*state, EngineState::Unloaded) {
            return;
        }
        *state = EngineState::Unloading;
        info!("unloading local model");
        *state = EngineState::Unloaded;
    }

    /// Generate text from the loaded model. Fails with
    /// [`LocalEngineError::ModelNotLoaded`] unless the engine is currently
    /// `loaded`.
    pub async fn generate(&self, prompt: &str, params: &GenerationParams) -> LocalResult<LocalGenerationResult> {
        if !self.state.read().await.is_loaded() {
            return Err(LocalEngineError::ModelNotLoaded);
        }
        let text = self.backend.generate(prompt, params).await;
        Ok(LocalGenerationResult { text })
    }

    /// Enumerate models available in `directory` without loading any of
    /// them. Returns an empty list for a missing directory.
    pub fn list_available_models(&self, directory: &Path) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(directory) else {
            return Vec::new();
        };
        entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir() || entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect()
    }
}
