//! A timer that resets on every user interaction; on expiry, asks the
//! delegate to evict the local model.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::delegate::ResourceDelegate;
use crate::observer::ObserverHandle;

/// Default idle window before the local model is evicted.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Evicts the local model after `idle_after` elapses with no call to
/// [`IdleUnloadSentinel::notify_interaction`].
pub struct IdleUnloadSentinel<D> {
    idle_after: Duration,
    notify: Arc<Notify>,
    delegate: Arc<D>,
    observer: ObserverHandle,
}

impl<D: ResourceDelegate + 'static> IdleUnloadSentinel<D> {
    /// Build a sentinel with the given idle window.
    pub fn new(idle_after: Duration, delegate: Arc<D>) -> Self {
        Self {
            idle_after,
            notify: Arc::new(Notify::new()),
            delegate,
            observer: ObserverHandle::new(),
        }
    }

    /// Build a sentinel with [`DEFAULT_IDLE_TIMEOUT`].
    pub fn with_default_timeout(delegate: Arc<D>) -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT, delegate)
    }

    /// Record a user interaction, resetting the idle timer.
    pub fn notify_interaction(&self) {
        self.notify.notify_one();
    }

    /// Start the idle timer. A no-op if already running.
    pub async fn start(&self) {
        let idle_after = self.idle_after;
        let notify = self.notify.clone();
        let delegate = self.delegate.clone();

        self.observer
            .start(async move {
                loop {
                    match tokio::time::timeout(idle_after, notify.notified()).await {
                        Ok(()) => continue,
                        Err(_elapsed) => delegate.evict_local_model_resources().await,
                    }
                }
            })
            .await;
    }

    /// Stop the idle timer. A no-op if not running. Restart-safe.
    pub async fn stop(&self) {
        self.observer.stop().await;
    }

    /// Whether the observer is currently running.
    pub async fn is_running(&self) -> bool {
        self.observer.is_running().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct CountingDelegate {
        evictions: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ResourceDelegate for CountingDelegate {
        async fn evict_local_model_resources(&self) {
            self.evictions.fetch_add(1, Ordering::SeqCst);
        }
        async fn notify_user(&self, _message: &str) {}
        async fn flush_buffers(&self) {}
        async fn throttle_accelerator(&self) {}
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_without_interaction_evicts() {
        let evictions = Arc::new(AtomicUsize::new(0));
        let delegate = Arc::new(CountingDelegate { evictions: evictions.clone() });
        let sentinel = IdleUnloadSentinel::new(Duration::from_millis(50), delegate);
        sentinel.start().await;

        tokio::time::advance(Duration::from_millis(60)).await;
        tokio::task::yield_now().await;
        assert_eq!(evictions.load(Ordering::SeqCst), 1);

        sentinel.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn interaction_resets_the_timer() {
        let evictions = Arc::new(AtomicUsize::new(0));
        let delegate = Arc::new(CountingDelegate { evictions: evictions.clone() });
        let sentinel = IdleUnloadSentinel::new(Duration::from_millis(50), delegate);
        sentinel.start().await;

        tokio::time::advance(Duration::from_millis(30)).await;
        sentinel.notify_interaction();
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(30)).await;
        tokio::task::yield_now().await;

        assert_eq!(evictions.load(Ordering::SeqCst), 0);
        sentinel.stop().await;
    }
}
