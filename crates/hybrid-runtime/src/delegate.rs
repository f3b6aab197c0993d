//! The delegate registry: callers observe a call's progress, completion,
//! and failure without the manager holding a direct reference back to any
//! particular caller beyond an id they can remove.

use async_trait::async_trait;
use dashmap::DashMap;
use hybrid_core::HybridExecutionResult;
use uuid::Uuid;

use crate::phase::Progress;

/// A delegate receiving progress, completion, and failure notifications.
#[async_trait]
pub trait ExecutionDelegate: Send + Sync {
    /// A progress milestone was reached.
    async fn on_progress(&self, progress: Progress);

    /// The call completed successfully.
    async fn on_completion(&self, result: &HybridExecutionResult);

    /// The call failed.
    async fn on_failure(&self, error: &str);
}

/// Holds every registered delegate, keyed by an id the caller uses to
/// remove it later. There is no weak-reference cleanup: a caller that
/// forgets to call `remove` leaks its delegate, same as forgetting to
/// close a handle.
#[derive(Default)]
pub struct DelegateRegistry {
    delegates: DashMap<Uuid, std::sync::Arc<dyn ExecutionDelegate>>,
}

impl DelegateRegistry {
    /// Build an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a delegate, returning the id used to remove it.
    pub fn add(&self, delegate: std::sync::Arc<dyn ExecutionDelegate>) -> Uuid {
        let id = Uuid::new_v4();
        self.delegates.insert(id, delegate);
        id
    }

    /// Remove a previously registered delegate. A no-op if `id` is unknown.
    pub fn remove(&self, id: Uuid) {
        self.delegates.remove(&id);
    }

    /// Broadcast a progress event to every registered delegate.
    pub async fn broadcast_progress(&self, progress: Progress) {
        for entry in self.delegates.iter() {
            entry.value().on_progress(progress).await;
        }
    }

    /// Broadcast a completion event to every registered delegate.
    pub async fn broadcast_completion(&self, result: &HybridExecutionResult) {
        for entry in self.delegates.iter() {
            entry.value().on_completion(result).await;
        }
    }

    /// Broadcast a failure event to every registered delegate.
    pub async fn broadcast_failure(&self, error: &str) {
        for entry in self.delegates.iter() {
            entry.value().on_failure(error).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Default)]
    struct CountingDelegate {
        progress_events: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ExecutionDelegate for CountingDelegate {
        async fn on_progress(&self, _progress: Progress) {
            self.progress_events.fetch_add(1, Ordering::SeqCst);
        }
        async fn on_completion(&self, _result: &HybridExecutionResult) {}
        async fn on_failure(&self, _error: &str) {}
    }

    #[tokio::test]
    async fn removed_delegate_stops_receiving_events() {
        let registry = DelegateRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let id = registry.add(Arc::new(CountingDelegate { progress_events: counter.clone() }));

        registry
            .broadcast_progress(Progress::new(crate::phase::PipelinePhase::Sanitizing, 0.1))
            .await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        registry.remove(id);
        registry
            .broadcast_progress(Progress::new(crate::phase::PipelinePhase::Sanitizing, 0.1))
            .await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
