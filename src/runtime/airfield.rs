//! The airfield facade: owns the shared resources and supervises batches.
//!
//! An `Airfield` runs at most one batch. The batch closes the unit queue when
//! it finishes, which stops the dispatcher; attempts still in flight keep
//! running and can be awaited with [`Airfield::drain`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::config::AirfieldConfig;
use crate::core::dispatcher::{DispatchLimits, Dispatcher, Spawn};
use crate::core::events::{AirfieldEvent, EventKind, EventRecorder};
use crate::core::ledger::{AttemptLedger, DropReason};
use crate::core::processor::UnitProcessor;
use crate::core::runway_pool::RunwayPool;
use crate::core::status::{StatusRegister, StatusValue};
use crate::core::tower_gate::TowerGate;
use crate::core::tracker::TaskTracker;
use crate::core::unit::Unit;
use crate::core::unit_queue::UnitQueue;
use crate::core::AirfieldError;
use crate::infra::feed::{run_status_feed, FeedStats, StatusSource};
use crate::infra::generator::submit_paced;
use crate::runtime::api::{AirfieldSnapshot, BatchReport};

/// Tower, runways, status register and queue wired to one dispatcher.
pub struct Airfield<S> {
    config: AirfieldConfig,
    gate: Arc<TowerGate>,
    runways: Arc<RunwayPool>,
    status: Arc<StatusRegister>,
    queue: Arc<UnitQueue>,
    ledger: Arc<AttemptLedger>,
    processor: Arc<UnitProcessor>,
    tracker: TaskTracker,
    events: EventRecorder,
    spawner: S,
    used: AtomicBool,
}

impl<S> Airfield<S>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    /// Wire an airfield from a validated configuration.
    pub fn new(
        config: AirfieldConfig,
        status: Arc<StatusRegister>,
        events: EventRecorder,
        spawner: S,
    ) -> Self {
        let gate = Arc::new(TowerGate::new(config.gate_capacity));
        let runways = Arc::new(RunwayPool::new(config.runway_count));
        let queue = Arc::new(UnitQueue::new(config.effective_queue_capacity()));
        let processor = Arc::new(UnitProcessor::new(
            Arc::clone(&gate),
            Arc::clone(&runways),
            Arc::clone(&status),
            Arc::clone(&queue),
            config.timings.clone(),
            events.clone(),
        ));
        Self {
            config,
            gate,
            runways,
            status,
            queue,
            ledger: Arc::new(AttemptLedger::new()),
            processor,
            tracker: TaskTracker::new(),
            events,
            spawner,
            used: AtomicBool::new(false),
        }
    }

    /// Active configuration.
    pub const fn config(&self) -> &AirfieldConfig {
        &self.config
    }

    /// The tower gate.
    pub const fn gate(&self) -> &Arc<TowerGate> {
        &self.gate
    }

    /// The runway pool.
    pub const fn runways(&self) -> &Arc<RunwayPool> {
        &self.runways
    }

    /// The status register.
    pub const fn status(&self) -> &Arc<StatusRegister> {
        &self.status
    }

    /// The unit queue.
    pub const fn queue(&self) -> &Arc<UnitQueue> {
        &self.queue
    }

    /// Per-unit attempt ledger.
    pub const fn ledger(&self) -> &Arc<AttemptLedger> {
        &self.ledger
    }

    /// Event handle shared by every component.
    pub const fn events(&self) -> &EventRecorder {
        &self.events
    }

    /// Write a status value directly, reporting it like a feed message would.
    pub fn set_status(&self, value: StatusValue) {
        if let Some(change) = self.status.set(value) {
            self.events.emit(AirfieldEvent::status_changed(change));
        }
    }

    /// Consume `source` in the background. The receiver yields the feed's
    /// result once the source ends or fails.
    pub fn start_feed<F>(&self, mut source: F) -> oneshot::Receiver<Result<FeedStats, AirfieldError>>
    where
        F: StatusSource + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let status = Arc::clone(&self.status);
        let events = self.events.clone();
        self.spawner.spawn(async move {
            let result = run_status_feed(&mut source, &status, &events).await;
            if let Err(err) = &result {
                tracing::warn!(error = %err, "status feed stopped");
            }
            let _ = tx.send(result);
        });
        rx
    }

    /// Run `units` through the airfield and report how they fared.
    ///
    /// Units are registered and submitted in order, waiting `gaps[i]` before
    /// unit `i` (missing gaps count as zero; see
    /// [`UnitGenerator::gaps`](crate::infra::UnitGenerator::gaps)). The batch
    /// then waits until every unit has settled or the batch timeout fires. The
    /// queue is closed before returning.
    ///
    /// # Errors
    ///
    /// [`AirfieldError::QueueClosed`] if this airfield already ran a batch.
    pub async fn run_batch(
        &self,
        units: Vec<Unit>,
        gaps: &[Duration],
    ) -> Result<BatchReport, AirfieldError> {
        if self.used.swap(true, Ordering::AcqRel) {
            return Err(AirfieldError::QueueClosed);
        }

        let batch_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        tracing::info!(batch_id = %batch_id, units = units.len(), "batch started");

        for unit in &units {
            self.ledger.register(*unit);
        }

        let dispatcher = Dispatcher::new(
            Arc::clone(&self.queue),
            Arc::clone(&self.processor),
            Arc::clone(&self.ledger),
            self.tracker.clone(),
            self.spawner.clone(),
            self.events.clone(),
            DispatchLimits {
                retry_limit: self.config.retry_limit,
                pacing: self.config.timings.dispatch_pacing(),
                attempt_timeout: self.config.attempt_timeout(),
            },
        );
        self.spawner.spawn(async move {
            dispatcher.run().await;
        });

        let work = async {
            let rejected = submit_paced(&self.queue, units, gaps).await;
            for unit in rejected {
                if self.ledger.mark_dropped(unit.id(), DropReason::QueueClosed) {
                    self.events
                        .emit(AirfieldEvent::dropped(&unit, 0, DropReason::QueueClosed));
                }
            }
            self.ledger.wait_settled().await;
        };
        let timed_out = tokio::time::timeout(self.config.batch_timeout(), work)
            .await
            .is_err();

        if timed_out {
            let pending = self.ledger.tally().pending;
            self.events.emit(
                AirfieldEvent::new(EventKind::BatchTimedOut)
                    .with_reason(format!("{pending} units unsettled")),
            );
        }
        self.queue.close().await;

        let report = BatchReport::from_tally(
            batch_id,
            self.ledger.tally(),
            started.elapsed(),
            timed_out,
        );
        tracing::info!(
            batch_id = %report.batch_id,
            succeeded = report.succeeded,
            failed = report.failed,
            elapsed_ms = %report.elapsed_ms,
            "batch finished"
        );
        Ok(report)
    }

    /// Wait up to `limit` for every processing attempt to finish.
    /// Returns false if some were still running.
    pub async fn drain(&self, limit: Duration) -> bool {
        self.tracker.wait_idle_for(limit).await
    }

    /// Attempts currently running.
    pub fn active_attempts(&self) -> usize {
        self.tracker.active()
    }

    /// Current resource view.
    pub fn snapshot(&self) -> AirfieldSnapshot {
        AirfieldSnapshot {
            status: self.status.get(),
            previous_status: self.status.previous(),
            gate_in_flight: self.gate.in_flight(),
            gate_peak: self.gate.peak(),
            gate_capacity: self.gate.capacity(),
            runways_occupied: self.runways.occupied_count(),
            runway_count: self.runways.len(),
            queued: self.queue.len(),
            queue_closed: self.queue.is_closed(),
        }
    }
}

impl<S> std::fmt::Debug for Airfield<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Airfield")
            .field("config", &self.config)
            .field("used", &self.used.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
