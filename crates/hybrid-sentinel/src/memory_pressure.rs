//! Observes the kernel memory-pressure dispatch source, a two-level signal
//! (`warning`, `critical`).

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::Mutex;

use crate::delegate::ResourceDelegate;
use crate::observer::ObserverHandle;
use crate::scheduler::{SchedulerTask, TaskScheduler};

/// A memory-pressure reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryPressureLevel {
    /// Elevated pressure; new inference should be denied but nothing
    /// running needs to stop.
    Warning,
    /// Severe pressure; the local model must be evicted immediately.
    Critical,
}

/// A stream of memory-pressure readings.
pub type MemoryPressureEvents = Pin<Box<dyn Stream<Item = MemoryPressureLevel> + Send>>;

/// On `warning`, denies new inference by enqueuing a marker task. On
/// `critical`, additionally notifies the user, flushes buffers, and evicts
/// the local model.
pub struct MemoryPressureObserver<D, S> {
    delegate: Arc<D>,
    scheduler: Arc<S>,
    events: Arc<Mutex<MemoryPressureEvents>>,
    observer: ObserverHandle,
}

impl<D, S> MemoryPressureObserver<D, S>
where
    D: ResourceDelegate + 'static,
    S: TaskScheduler + 'static,
{
    /// Build an observer watching `events`.
    pub fn new(delegate: Arc<D>, scheduler: Arc<S>, events: MemoryPressureEvents) -> Self {
        Self {
            delegate,
            scheduler,
            events: Arc::new(Mutex::new(events)),
            observer: ObserverHandle::new(),
        }
    }

    /// Start observing. A no-op if already running.
    pub async fn start(&self) {
        let delegate = self.delegate.clone();
        let scheduler = self.scheduler.clone();
        let events = self.events.clone();

        self.observer
            .start(async move {
                loop {
                    let next = events.lock().await.next().await;
                    let Some(level) = next else { break };
                    scheduler
                        .submit(SchedulerTask::critical("deny_new_inference"))
                        .await;
                    if level == MemoryPressureLevel::Critical {
                        delegate.notify_user("memory pressure critical: stopping local inference").await;
                        delegate.flush_buffers().await;
                        delegate.evict_local_model_resources().await;
                    }
                }
            })
            .await;
    }

    /// Stop observing. A no-op if not running. Restart-safe.
    pub async fn stop(&self) {
        self.observer.stop().await;
    }

    /// Whether the observer is currently running.
    pub async fn is_running(&self) -> bool {
        self.observer.is_running().await
    }
}
