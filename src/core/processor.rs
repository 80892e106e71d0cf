//! Per-unit processing attempt.
//!
//! One call to [`UnitProcessor::process`] walks a unit through
//! `Admitted -> RunwayAssigned -> Disembarking -> Completed`, or bails out to
//! a backoff-and-requeue or a drop. The attempt
//! never returns an error; its [`AttemptOutcome`] is the only result.
//!
//! Gate and runway are held through RAII guards, so both are released on
//! every path out of the function.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::StageTimings;
use crate::core::events::{AirfieldEvent, EventKind, EventRecorder};
use crate::core::ledger::DropReason;
use crate::core::policy::admit;
use crate::core::runway_pool::{RunwayId, RunwayPool};
use crate::core::status::StatusRegister;
use crate::core::tower_gate::TowerGate;
use crate::core::unit::Unit;
use crate::core::unit_queue::UnitQueue;
use crate::core::AirfieldError;

/// Why a unit went back onto the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequeueCause {
    /// Gate was full.
    Congestion,
    /// Policy rejected the category.
    PolicyDenied,
    /// No runway was free.
    NoRunway,
}

impl RequeueCause {
    /// Stable snake_case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Congestion => "congestion",
            Self::PolicyDenied => "policy_denied",
            Self::NoRunway => "no_runway",
        }
    }
}

/// How one attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Landed and disembarked.
    Completed {
        /// Runway used.
        runway: RunwayId,
    },
    /// Sent back for another attempt.
    Requeued(RequeueCause),
    /// Permanently removed.
    Dropped(DropReason),
}

/// Runs processing attempts against shared airfield resources.
#[derive(Debug)]
pub struct UnitProcessor {
    gate: Arc<TowerGate>,
    runways: Arc<RunwayPool>,
    status: Arc<StatusRegister>,
    queue: Arc<UnitQueue>,
    timings: StageTimings,
    events: EventRecorder,
}

impl UnitProcessor {
    /// Wire a processor to its collaborators.
    #[must_use]
    pub fn new(
        gate: Arc<TowerGate>,
        runways: Arc<RunwayPool>,
        status: Arc<StatusRegister>,
        queue: Arc<UnitQueue>,
        timings: StageTimings,
        events: EventRecorder,
    ) -> Self {
        Self {
            gate,
            runways,
            status,
            queue,
            timings,
            events,
        }
    }

    /// Run one attempt for `unit`.
    pub async fn process(&self, unit: Unit, attempt: u32) -> AttemptOutcome {
        let slot = match self.gate.enter() {
            Ok(slot) => slot,
            Err(congested) => {
                self.events.emit(
                    AirfieldEvent::for_unit(EventKind::Congested, &unit, attempt)
                        .with_reason(congested.to_string()),
                );
                tokio::time::sleep(self.timings.congestion_backoff()).await;
                return self.requeue_or_drop(unit, attempt, RequeueCause::Congestion);
            }
        };

        let status = self.status.get();
        if let Err(denied) = admit(unit.category(), status) {
            self.events.emit(
                AirfieldEvent::for_unit(EventKind::PermissionDenied, &unit, attempt)
                    .with_status(status)
                    .with_reason(denied.to_string()),
            );
            drop(slot);
            tokio::time::sleep(self.timings.denial_backoff()).await;
            return self.requeue_or_drop(unit, attempt, RequeueCause::PolicyDenied);
        }

        self.events.emit(
            AirfieldEvent::for_unit(EventKind::Admitted, &unit, attempt).with_status(status),
        );
        tokio::time::sleep(self.timings.tower_handling()).await;

        let lease = match self.runways.lease() {
            Ok(lease) => lease,
            Err(unavailable) => {
                self.events.emit(
                    AirfieldEvent::for_unit(EventKind::NoRunwayAvailable, &unit, attempt)
                        .with_reason(unavailable.to_string()),
                );
                // The gate slot stays held across this blocking requeue and is
                // only released when the attempt returns.
                let outcome = match self.queue.enqueue(unit).await {
                    Ok(()) => {
                        self.emit_requeued(&unit, attempt, RequeueCause::NoRunway);
                        AttemptOutcome::Requeued(RequeueCause::NoRunway)
                    }
                    Err(err) => self.drop_unit(&unit, attempt, &err),
                };
                drop(slot);
                return outcome;
            }
        };

        let runway = lease.id();
        self.events.emit(
            AirfieldEvent::for_unit(EventKind::RunwayAssigned, &unit, attempt).with_runway(runway),
        );
        tokio::time::sleep(self.timings.landing()).await;

        self.events.emit(
            AirfieldEvent::for_unit(EventKind::RunwayReleased, &unit, attempt).with_runway(runway),
        );
        drop(lease);
        tokio::time::sleep(self.timings.disembark()).await;

        drop(slot);
        self.events.emit(
            AirfieldEvent::for_unit(EventKind::Completed, &unit, attempt).with_runway(runway),
        );
        AttemptOutcome::Completed { runway }
    }

    fn requeue_or_drop(&self, unit: Unit, attempt: u32, cause: RequeueCause) -> AttemptOutcome {
        match self.queue.try_enqueue(unit) {
            Ok(()) => {
                self.emit_requeued(&unit, attempt, cause);
                AttemptOutcome::Requeued(cause)
            }
            Err(err) => self.drop_unit(&unit, attempt, &err),
        }
    }

    fn drop_unit(&self, unit: &Unit, attempt: u32, err: &AirfieldError) -> AttemptOutcome {
        let reason = match err {
            AirfieldError::QueueOverflow => DropReason::QueueOverflow,
            _ => DropReason::QueueClosed,
        };
        self.events.emit(AirfieldEvent::dropped(unit, attempt, reason));
        AttemptOutcome::Dropped(reason)
    }

    fn emit_requeued(&self, unit: &Unit, attempt: u32, cause: RequeueCause) {
        self.events.emit(
            AirfieldEvent::for_unit(EventKind::Requeued, unit, attempt).with_reason(cause.as_str()),
        );
    }
}
