//! Wait group for fire-and-forget processing tasks.
//!
//! Tasks are never cancelled. A [`TaskTicket`] is held for the lifetime of a
//! task and returned on drop, so callers can wait for the group to go idle or
//! give up after a deadline and leave stragglers running.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    active: AtomicUsize,
    idle: Notify,
}

/// Shared counter of live tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskTracker {
    inner: Arc<Inner>,
}

/// RAII ticket; the tracker counts down when it is dropped, even on panic.
#[derive(Debug)]
pub struct TaskTicket {
    inner: Arc<Inner>,
}

impl TaskTracker {
    /// Empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task.
    #[must_use]
    pub fn ticket(&self) -> TaskTicket {
        self.inner.active.fetch_add(1, Ordering::AcqRel);
        TaskTicket {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Live tasks right now.
    #[must_use]
    pub fn active(&self) -> usize {
        self.inner.active.load(Ordering::Acquire)
    }

    /// Wait until no tickets are outstanding.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.active() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Wait for idle up to `limit`; true if the group drained in time.
    pub async fn wait_idle_for(&self, limit: Duration) -> bool {
        tokio::time::timeout(limit, self.wait_idle()).await.is_ok()
    }
}

impl Drop for TaskTicket {
    fn drop(&mut self) {
        if self.inner.active.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
