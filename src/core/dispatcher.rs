//! Dispatcher: drains the unit queue and starts one task per attempt.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::core::events::{AirfieldEvent, EventKind, EventRecorder};
use crate::core::ledger::{AttemptLedger, DropReason};
use crate::core::processor::{AttemptOutcome, UnitProcessor};
use crate::core::tracker::TaskTracker;
use crate::core::unit::Unit;
use crate::core::unit_queue::UnitQueue;

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn an async task that returns a future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Limits the dispatcher applies to every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchLimits {
    /// Attempts allowed per unit.
    pub retry_limit: u32,
    /// Pause after each dequeue.
    pub pacing: Duration,
    /// Watchdog for a single attempt.
    pub attempt_timeout: Duration,
}

/// Pulls units off the queue and spawns processing attempts.
pub struct Dispatcher<S> {
    queue: Arc<UnitQueue>,
    processor: Arc<UnitProcessor>,
    ledger: Arc<AttemptLedger>,
    tracker: TaskTracker,
    spawner: S,
    events: EventRecorder,
    limits: DispatchLimits,
}

impl<S> Dispatcher<S>
where
    S: Spawn,
{
    /// Wire a dispatcher.
    #[must_use]
    pub fn new(
        queue: Arc<UnitQueue>,
        processor: Arc<UnitProcessor>,
        ledger: Arc<AttemptLedger>,
        tracker: TaskTracker,
        spawner: S,
        events: EventRecorder,
        limits: DispatchLimits,
    ) -> Self {
        Self {
            queue,
            processor,
            ledger,
            tracker,
            spawner,
            events,
            limits,
        }
    }

    /// Dispatch until the queue is closed. Returns how many units were taken.
    pub async fn run(self) -> usize {
        let mut taken = 0usize;
        while let Some(unit) = self.queue.dequeue().await {
            taken += 1;
            tokio::time::sleep(self.limits.pacing).await;
            self.dispatch(unit);
        }
        tracing::info!(taken, "dispatcher stopped: queue closed");
        taken
    }

    /// Count an attempt for `unit` and start it, or drop the unit if it has
    /// used up its retries.
    pub fn dispatch(&self, unit: Unit) {
        let attempt = self.ledger.begin_attempt(&unit);
        if attempt > self.limits.retry_limit {
            if self.ledger.mark_dropped(unit.id(), DropReason::RetryExhausted) {
                self.events
                    .emit(AirfieldEvent::dropped(&unit, attempt, DropReason::RetryExhausted));
            }
            return;
        }

        let (done_tx, done_rx) = oneshot::channel::<AttemptOutcome>();
        let processor = Arc::clone(&self.processor);
        let ledger = Arc::clone(&self.ledger);
        let ticket = self.tracker.ticket();
        self.spawner.spawn(async move {
            let _ticket = ticket;
            let outcome = processor.process(unit, attempt).await;
            match outcome {
                AttemptOutcome::Completed { .. } => {
                    ledger.mark_completed(unit.id());
                }
                AttemptOutcome::Dropped(reason) => {
                    ledger.mark_dropped(unit.id(), reason);
                }
                AttemptOutcome::Requeued(_) => {}
            }
            let _ = done_tx.send(outcome);
        });

        // Watchdog only observes; the attempt keeps running past the deadline.
        let events = self.events.clone();
        let limit = self.limits.attempt_timeout;
        self.spawner.spawn(async move {
            if tokio::time::timeout(limit, done_rx).await.is_err() {
                events.emit(AirfieldEvent::for_unit(EventKind::AttemptOverdue, &unit, attempt));
            }
        });
    }
}
