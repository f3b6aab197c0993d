//! Watches thermal ladder transitions and reacts at the `serious` and
//! `critical` rungs.

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use hybrid_core::ThermalState;
use tokio::sync::Mutex;

use crate::delegate::ResourceDelegate;
use crate::observer::ObserverHandle;
use crate::scheduler::{SchedulerTask, TaskScheduler};

/// A stream of thermal ladder readings.
pub type ThermalEvents = Pin<Box<dyn Stream<Item = ThermalState> + Send>>;

/// On a transition into `serious`, throttles the accelerator and notifies
/// the user. On a transition into `critical`, cancels active inference
/// (via a critical scheduler submission), flushes buffers, evicts the
/// local model, and notifies the user with an emergency-shutdown message.
pub struct ThermalWatcher<D, S> {
    delegate: Arc<D>,
    scheduler: Arc<S>,
    events: Arc<Mutex<ThermalEvents>>,
    observer: ObserverHandle,
}

impl<D, S> ThermalWatcher<D, S>
where
    D: ResourceDelegate + 'static,
    S: TaskScheduler + 'static,
{
    /// Build a watcher over `events`.
    pub fn new(delegate: Arc<D>, scheduler: Arc<S>, events: ThermalEvents) -> Self {
        Self {
            delegate,
            scheduler,
            events: Arc::new(Mutex::new(events)),
            observer: ObserverHandle::new(),
        }
    }

    /// Start watching. A no-op if already running.
    pub async fn start(&self) {
        let delegate = self.delegate.clone();
        let scheduler = self.scheduler.clone();
        let events = self.events.clone();

        self.observer
            .start(async move {
                let mut previous = ThermalState::Nominal;
                loop {
                    let next = events.lock().await.next().await;
                    let Some(current) = next else { break };
                    if current != previous {
                        match current {
                            ThermalState::Serious => {
                                delegate.throttle_accelerator().await;
                                delegate.notify_user("thermal throttling engaged").await;
                            }
                            ThermalState::Critical => {
                                scheduler
                                    .submit(SchedulerTask::critical("thermal_emergency_shutdown"))
                                    .await;
                                delegate.flush_buffers().await;
                                delegate.evict_local_model_resources().await;
                                delegate.notify_user("Emergency Shutdown").await;
                            }
                            ThermalState::Nominal | ThermalState::Fair => {}
                        }
                    }
                    previous = current;
                }
            })
            .await;
    }

    /// Stop watching. A no-op if not running. Restart-safe.
    pub async fn stop(&self) {
        self.observer.stop().await;
    }

    /// Whether the observer is currently running.
    pub async fn is_running(&self) -> bool {
        self.observer.is_running().await
    }
}
