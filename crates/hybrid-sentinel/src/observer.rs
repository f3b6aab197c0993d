//! Shared cancellable-task bookkeeping used by every sentinel observer.

use std::future::Future;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Owns an optional background task. `stop` aborts it; `start` spawns a
/// fresh one. Calling `start` while already running is a no-op, and calling
/// `stop` while not running is a no-op — both make restart sequences
/// (`stop` then `start`) safe to call repeatedly.
#[derive(Default)]
pub(crate) struct ObserverHandle {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ObserverHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn start<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut guard = self.task.lock().await;
        if guard.is_some() {
            return;
        }
        *guard = Some(tokio::spawn(future));
    }

    pub(crate) async fn stop(&self) {
        if let Some(handle) = self.task.lock().await.take() {
            handle.abort();
        }
    }

    pub(crate) async fn is_running(&self) -> bool {
        self.task.lock().await.is_some()
    }
}
