//! Cooperative cancellation: lets a critical-tier scheduler submission
//! preempt whatever [`crate::HybridExecutionManager::execute`] call is
//! currently in flight.

use std::sync::Arc;

use async_trait::async_trait;
use hybrid_core::PriorityTier;
use hybrid_sentinel::{SchedulerTask, TaskScheduler};
use tokio::sync::Notify;

/// A broadcast-style cancellation signal. `cancel` wakes every task
/// currently awaiting [`CancellationToken::cancelled`]; a call to
/// `cancelled` that starts *after* `cancel` was last called does not
/// observe that past signal, matching `Notify::notify_waiters`'s
/// semantics. This means cancelling preempts only calls already in
/// flight at the moment of cancellation, not calls made afterward.
#[derive(Clone, Default)]
pub struct CancellationToken {
    notify: Arc<Notify>,
}

impl CancellationToken {
    /// Build a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake every task currently awaiting [`Self::cancelled`].
    pub fn cancel(&self) {
        self.notify.notify_waiters();
    }

    /// Resolve the next time [`Self::cancel`] is called.
    pub async fn cancelled(&self) {
        self.notify.notified().await;
    }
}

/// A [`TaskScheduler`] that cancels a [`CancellationToken`] on any
/// `Critical`-tier submission, so a sentinel observer's emergency
/// submission preempts in-flight execution without the sentinel knowing
/// anything about the execution manager.
pub struct ExecutionCancellationScheduler {
    token: CancellationToken,
}

impl ExecutionCancellationScheduler {
    /// Build a scheduler that cancels `token` on a critical submission.
    #[must_use]
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TaskScheduler for ExecutionCancellationScheduler {
    async fn submit(&self, task: SchedulerTask) {
        if task.tier == PriorityTier::Critical {
            self.token.cancel();
        }
    }
}
