//! The delegate a sentinel notifies when it decides to act. All effects are
//! best-effort: a delegate call never fails the observer that issued it.

use async_trait::async_trait;

/// Side channel a sentinel drives in response to a resource signal.
#[async_trait]
pub trait ResourceDelegate: Send + Sync {
    /// Evict the currently loaded local model to free its resources.
    async fn evict_local_model_resources(&self);

    /// Surface a user-visible notice (for example "Emergency Shutdown").
    async fn notify_user(&self, message: &str);

    /// Flush any buffered output before an eviction or shutdown.
    async fn flush_buffers(&self);

    /// Throttle the local accelerator (NPU/GPU) without a full eviction.
    async fn throttle_accelerator(&self);
}

/// A delegate that records nothing and does nothing; useful for sentinels
/// wired up without a real local engine to evict.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDelegate;

#[async_trait]
impl ResourceDelegate for NullDelegate {
    async fn evict_local_model_resources(&self) {}
    async fn notify_user(&self, _message: &str) {}
    async fn flush_buffers(&self) {}
    async fn throttle_accelerator(&self) {}
}
