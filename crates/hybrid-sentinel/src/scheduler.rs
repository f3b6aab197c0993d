//! The scheduler contract the sentinel submits tasks to. The sentinel never
//! executes anything itself; it only enqueues.

use async_trait::async_trait;
use hybrid_core::PriorityTier;

/// A unit of preemption work submitted by a sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerTask {
    /// The priority tier this task runs at. A `Critical` task preempts any
    /// running `UserInitiated` or `Background` task.
    pub tier: PriorityTier,
    /// A short human-readable label for logging.
    pub label: String,
}

impl SchedulerTask {
    /// Build a critical-tier task with the given label.
    #[must_use]
    pub fn critical(label: impl Into<String>) -> Self {
        Self {
            tier: PriorityTier::Critical,
            label: label.into(),
        }
    }
}

/// Accepts tasks submitted by sentinels. The sole invariant a conforming
/// implementation must uphold: a `Critical`-tier submission preempts any
/// running `UserInitiated` or `Background` task.
#[async_trait]
pub trait TaskScheduler: Send + Sync {
    /// Submit a task for scheduling.
    async fn submit(&self, task: SchedulerTask);
}

/// An in-memory scheduler recording every submission in order, for tests
/// and for deployments that don't yet have a real preemptive scheduler
/// wired in.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    submissions: tokio::sync::Mutex<Vec<SchedulerTask>>,
}

impl RecordingScheduler {
    /// Build an empty recording scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every task submitted so far, in submission order.
    pub async fn submissions(&self) -> Vec<SchedulerTask> {
        self.submissions.lock().await.clone()
    }
}

#[async_trait]
impl TaskScheduler for RecordingScheduler {
    async fn submit(&self, task: SchedulerTask) {
        self.submissions.lock().await.push(task);
    }
}
