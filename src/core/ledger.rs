//! Retry-tracking map and batch accounting.
//!
//! The ledger outlives individual attempts: every attempt of a unit bumps the
//! same counter, and the first terminal fate recorded for a unit sticks.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use crate::core::unit::{Unit, UnitId};

/// Why a unit was permanently removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Requeue found the queue full.
    QueueOverflow,
    /// Attempt counter passed the retry limit.
    RetryExhausted,
    /// Requeue found the queue already closed.
    QueueClosed,
}

impl DropReason {
    /// Stable snake_case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QueueOverflow => "queue_overflow",
            Self::RetryExhausted => "retry_exhausted",
            Self::QueueClosed => "queue_closed",
        }
    }
}

/// Where a unit stands in the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitFate {
    /// Not yet terminal.
    Pending,
    /// Finished successfully.
    Completed,
    /// Removed for good.
    Dropped(DropReason),
}

/// Ledger entry for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// The unit.
    pub unit: Unit,
    /// Attempts started, including one rejected for exceeding the limit.
    pub attempts: u32,
    /// Current fate.
    pub fate: UnitFate,
}

/// Aggregate counts at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTally {
    /// Units registered.
    pub total: usize,
    /// Units completed.
    pub completed: usize,
    /// Dropped on a full queue.
    pub dropped_queue_overflow: usize,
    /// Dropped after too many attempts.
    pub dropped_retry_exhausted: usize,
    /// Dropped on a closed queue.
    pub dropped_queue_closed: usize,
    /// Still pending.
    pub pending: usize,
    /// Sum of all attempt counters.
    pub attempts: u64,
}

/// Shared per-unit attempt counters and fates.
#[derive(Debug, Default)]
pub struct AttemptLedger {
    records: Mutex<HashMap<UnitId, UnitRecord>>,
    settled: Notify,
}

impl AttemptLedger {
    /// Empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `unit` as pending. Re-registering a known id is a no-op.
    pub fn register(&self, unit: Unit) {
        self.records.lock().entry(unit.id()).or_insert(UnitRecord {
            unit,
            attempts: 0,
            fate: UnitFate::Pending,
        });
    }

    /// Count a new attempt and return the updated counter.
    ///
    /// Units that were never registered are registered on the spot.
    pub fn begin_attempt(&self, unit: &Unit) -> u32 {
        let mut records = self.records.lock();
        let record = records.entry(unit.id()).or_insert(UnitRecord {
            unit: *unit,
            attempts: 0,
            fate: UnitFate::Pending,
        });
        record.attempts = record.attempts.saturating_add(1);
        record.attempts
    }

    /// Record success. Ignored if the unit already has a terminal fate.
    pub fn mark_completed(&self, id: UnitId) -> bool {
        self.settle(id, UnitFate::Completed)
    }

    /// Record a drop. Ignored if the unit already has a terminal fate.
    pub fn mark_dropped(&self, id: UnitId, reason: DropReason) -> bool {
        self.settle(id, UnitFate::Dropped(reason))
    }

    fn settle(&self, id: UnitId, fate: UnitFate) -> bool {
        let changed = {
            let mut records = self.records.lock();
            match records.get_mut(&id) {
                Some(record) if record.fate == UnitFate::Pending => {
                    record.fate = fate;
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.settled.notify_waiters();
        }
        changed
    }

    /// Entry for `id`.
    #[must_use]
    pub fn record(&self, id: UnitId) -> Option<UnitRecord> {
        self.records.lock().get(&id).copied()
    }

    /// True when no registered unit is pending.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.records
            .lock()
            .values()
            .all(|record| record.fate != UnitFate::Pending)
    }

    /// Wait until every registered unit has a terminal fate.
    pub async fn wait_settled(&self) {
        loop {
            let notified = self.settled.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_settled() {
                return;
            }
            notified.await;
        }
    }

    /// Current counts.
    #[must_use]
    pub fn tally(&self) -> LedgerTally {
        let records = self.records.lock();
        let mut tally = LedgerTally {
            total: records.len(),
            ..LedgerTally::default()
        };
        for record in records.values() {
            tally.attempts += u64::from(record.attempts);
            match record.fate {
                UnitFate::Pending => tally.pending += 1,
                UnitFate::Completed => tally.completed += 1,
                UnitFate::Dropped(DropReason::QueueOverflow) => tally.dropped_queue_overflow += 1,
                UnitFate::Dropped(DropReason::RetryExhausted) => {
                    tally.dropped_retry_exhausted += 1;
                }
                UnitFate::Dropped(DropReason::QueueClosed) => tally.dropped_queue_closed += 1,
            }
        }
        tally
    }

    /// All records, ordered by unit id.
    #[must_use]
    pub fn records(&self) -> Vec<UnitRecord> {
        let mut records: Vec<_> = self.records.lock().values().copied().collect();
        records.sort_by_key(|record| record.unit.id());
        records
    }
}
