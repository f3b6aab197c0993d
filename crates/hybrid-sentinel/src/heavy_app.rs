//! Observes OS "application launched" notifications and preempts on a
//! closed allowlist of resource-intensive applications.

use std::collections::HashSet;
use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::Mutex;

use crate::delegate::ResourceDelegate;
use crate::observer::ObserverHandle;
use crate::scheduler::{SchedulerTask, TaskScheduler};

/// A stream of launched applications' stable identifiers.
pub type LaunchEvents = Pin<Box<dyn Stream<Item = String> + Send>>;

/// On every launch of an allowlisted application, enqueues a critical task
/// and asks the delegate to evict local model resources.
pub struct HeavyAppSentinel<D, S> {
    allowlist: HashSet<String>,
    delegate: Arc<D>,
    scheduler: Arc<S>,
    events: Arc<Mutex<LaunchEvents>>,
    observer: ObserverHandle,
}

impl<D, S> HeavyAppSentinel<D, S>
where
    D: ResourceDelegate + 'static,
    S: TaskScheduler + 'static,
{
    /// Build a sentinel watching `events` against `allowlist`.
    pub fn new(allowlist: HashSet<String>, delegate: Arc<D>, scheduler: Arc<S>, events: LaunchEvents) -> Self {
        Self {
            allowlist,
            delegate,
            scheduler,
            events: Arc::new(Mutex::new(events)),
            observer: ObserverHandle::new(),
        }
    }

    /// Start observing. A no-op if already running.
    pub async fn start(&self) {
        let allowlist = self.allowlist.clone();
        let delegate = self.delegate.clone();
        let scheduler = self.scheduler.clone();
        let events = self.events.clone();

        self.observer
            .start(async move {
                loop {
                    let next = events.lock().await.next().await;
                    let Some(identifier) = next else { break };
                    if allowlist.contains(&identifier) {
                        scheduler
                            .submit(SchedulerTask::critical(format!("heavy_app_launched:{identifier}")))
                            .await;
                        delegate.evict_local_model_resources().await;
                    }
                }
            })
            .await;
    }

    /// Stop observing. A no-op if not running. Restart-safe: a subsequent
    /// `start` resumes consuming the same underlying event stream.
    pub async fn stop(&self) {
        self.observer.stop().await;
    }

    /// Whether the observer is currently running.
    pub async fn is_running(&self) -> bool {
        self.observer.is_running().await
    }
}
