//! Serialisable report and snapshot models.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::ledger::LedgerTally;
use crate::core::status::StatusValue;
use crate::core::AirfieldError;

/// Outcome of one batch.
///
/// `succeeded + failed == total`; units still in flight when the batch gave up
/// count as failed and are also reported under `unprocessed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Random batch identifier.
    pub batch_id: String,
    /// Units submitted.
    pub total: usize,
    /// Units completed.
    pub succeeded: usize,
    /// Units not completed.
    pub failed: usize,
    /// Dropped on a full queue.
    pub dropped_queue_overflow: usize,
    /// Dropped after too many attempts.
    pub dropped_retry_exhausted: usize,
    /// Dropped on a closed queue.
    pub dropped_queue_closed: usize,
    /// Units without a terminal fate when the report was taken.
    pub unprocessed: usize,
    /// Attempts started across all units.
    pub attempts: u64,
    /// Wall-clock time of the batch.
    pub elapsed_ms: u128,
    /// True if the batch timeout fired before every unit settled.
    pub timed_out: bool,
    /// `elapsed_ms / succeeded`, absent when nothing succeeded.
    pub average_ms_per_success: Option<f64>,
}

impl BatchReport {
    /// Build a report from ledger counts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_tally(
        batch_id: impl Into<String>,
        tally: LedgerTally,
        elapsed: Duration,
        timed_out: bool,
    ) -> Self {
        let elapsed_ms = elapsed.as_millis();
        let average_ms_per_success =
            (tally.completed > 0).then(|| elapsed_ms as f64 / tally.completed as f64);
        Self {
            batch_id: batch_id.into(),
            total: tally.total,
            succeeded: tally.completed,
            failed: tally.total - tally.completed,
            dropped_queue_overflow: tally.dropped_queue_overflow,
            dropped_retry_exhausted: tally.dropped_retry_exhausted,
            dropped_queue_closed: tally.dropped_queue_closed,
            unprocessed: tally.pending,
            attempts: tally.attempts,
            elapsed_ms,
            timed_out,
            average_ms_per_success,
        }
    }

    /// Err if the batch ran out of time.
    ///
    /// # Errors
    ///
    /// [`AirfieldError::Timeout`] when `timed_out` is set.
    pub const fn ensure_complete(&self) -> Result<(), AirfieldError> {
        if self.timed_out {
            Err(AirfieldError::Timeout)
        } else {
            Ok(())
        }
    }
}

/// Point-in-time view of the shared resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirfieldSnapshot {
    /// Current status value.
    pub status: StatusValue,
    /// Status before the last write.
    pub previous_status: StatusValue,
    /// Units inside the gate.
    pub gate_in_flight: u32,
    /// Highest gate occupancy seen.
    pub gate_peak: u32,
    /// Gate capacity.
    pub gate_capacity: u32,
    /// Runways currently claimed.
    pub runways_occupied: usize,
    /// Runways in the pool.
    pub runway_count: usize,
    /// Units waiting in the queue.
    pub queued: usize,
    /// Whether the queue has been closed.
    pub queue_closed: bool,
}

/// Health response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
}

/// Healthy while every shared resource is within its bound.
#[must_use]
pub const fn health(snapshot: &AirfieldSnapshot) -> Health {
    Health {
        ok: snapshot.gate_in_flight <= snapshot.gate_capacity
            && snapshot.runways_occupied <= snapshot.runway_count,
    }
}
