//! Outstanding-work counter used by `TaskManager::await_idle`.
//!
//! A wait-group built on `tokio::sync::watch`: `acquire` bumps the count and
//! hands back a guard, dropping the guard lowers it, and `wait_idle` resolves
//! once the count is zero.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Clone)]
pub(crate) struct Outstanding {
    tx: Arc<watch::Sender<usize>>,
}

impl Outstanding {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Mark one unit of work as outstanding.
    ///
    /// Must be called before the job is spawned, so `wait_idle` can never
    /// observe zero while the job exists.
    pub(crate) fn acquire(&self) -> OutstandingGuard {
        self.tx.send_modify(|n| *n += 1);
        OutstandingGuard {
            tx: Arc::clone(&self.tx),
        }
    }

    pub(crate) fn count(&self) -> usize {
        *self.tx.borrow()
    }

    pub(crate) async fn wait_idle(&self) {
        let mut rx = self.tx.subscribe();
        // the sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

/// Releases its unit of work on drop. The job drops it after the completion
/// step is committed.
pub(crate) struct OutstandingGuard {
    tx: Arc<watch::Sender<usize>>,
}

impl Drop for OutstandingGuard {
    fn drop(&mut self) {
        self.tx.send_modify(|n| *n -= 1);
    }
}
