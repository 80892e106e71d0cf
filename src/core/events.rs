//! Observable scheduling transitions and the sinks that collect them.
//!
//! Every transition is logged through `tracing`. A sink is optional: the
//! scheduler behaves identically whether or not anyone consumes events.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::ledger::DropReason;
use crate::core::runway_pool::RunwayId;
use crate::core::status::{describe_status, StatusChange, StatusValue};
use crate::core::unit::{Category, Unit, UnitId, UnitState};
use crate::util::clock::now_ms;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Status register changed (or received its first value).
    StatusChanged,
    /// A feed message could not be parsed.
    MalformedStatus,
    /// Gate was full when the unit tried to enter.
    Congested,
    /// Admission policy rejected the unit.
    PermissionDenied,
    /// Unit entered the gate and was permitted.
    Admitted,
    /// Unit claimed a runway.
    RunwayAssigned,
    /// Every runway was occupied.
    NoRunwayAvailable,
    /// Unit gave its runway back.
    RunwayReleased,
    /// Unit finished.
    Completed,
    /// Unit went back onto the queue.
    Requeued,
    /// Unit was permanently removed.
    Dropped,
    /// An attempt ran past the per-unit admission timeout.
    AttemptOverdue,
    /// The batch stopped waiting before every unit settled.
    BatchTimedOut,
}

impl EventKind {
    /// State the unit is in when this event fires, if the event concerns a unit.
    #[must_use]
    pub const fn unit_state(self) -> Option<UnitState> {
        match self {
            Self::Congested => Some(UnitState::CongestionRejected),
            Self::PermissionDenied => Some(UnitState::PermissionDenied),
            Self::Admitted => Some(UnitState::Admitted),
            Self::RunwayAssigned => Some(UnitState::RunwayAssigned),
            Self::NoRunwayAvailable => Some(UnitState::NoRunwayAvailable),
            Self::RunwayReleased => Some(UnitState::Disembarking),
            Self::Completed => Some(UnitState::Completed),
            Self::Requeued => Some(UnitState::Queued),
            Self::Dropped => Some(UnitState::Dropped),
            Self::StatusChanged
            | Self::MalformedStatus
            | Self::AttemptOverdue
            | Self::BatchTimedOut => None,
        }
    }
}

/// A discrete, timestamped transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirfieldEvent {
    /// Transition kind.
    pub kind: EventKind,
    /// Unit concerned, if any.
    pub unit: Option<UnitId>,
    /// Category of that unit.
    pub category: Option<Category>,
    /// Attempt number of that unit.
    pub attempt: Option<u32>,
    /// Runway involved.
    pub runway: Option<RunwayId>,
    /// Status value involved.
    pub status: Option<StatusValue>,
    /// Previous status on a change.
    pub previous_status: Option<StatusValue>,
    /// Free-form context.
    pub reason: Option<String>,
    /// Milliseconds since epoch.
    pub at_ms: u128,
}

impl AirfieldEvent {
    /// Bare event of `kind`, stamped now.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            unit: None,
            category: None,
            attempt: None,
            runway: None,
            status: None,
            previous_status: None,
            reason: None,
            at_ms: now_ms(),
        }
    }

    /// Event about `unit` on its `attempt`.
    #[must_use]
    pub fn for_unit(kind: EventKind, unit: &Unit, attempt: u32) -> Self {
        let mut event = Self::new(kind);
        event.unit = Some(unit.id());
        event.category = Some(unit.category());
        event.attempt = Some(attempt);
        event
    }

    /// Status change event.
    #[must_use]
    pub fn status_changed(change: StatusChange) -> Self {
        let mut event = Self::new(EventKind::StatusChanged);
        event.status = Some(change.current);
        event.previous_status = Some(change.previous);
        event.reason = Some(describe_status(change.current).to_string());
        event
    }

    /// Drop event carrying its reason.
    #[must_use]
    pub fn dropped(unit: &Unit, attempt: u32, reason: DropReason) -> Self {
        Self::for_unit(EventKind::Dropped, unit, attempt).with_reason(reason.as_str())
    }

    /// Attach a runway id.
    #[must_use]
    pub const fn with_runway(mut self, runway: RunwayId) -> Self {
        self.runway = Some(runway);
        self
    }

    /// Attach a status value.
    #[must_use]
    pub const fn with_status(mut self, status: StatusValue) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach context text.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Event sink abstraction.
pub trait EventSink: Send {
    /// Record an event.
    fn record(&mut self, event: AirfieldEvent);
}

/// Bounded in-memory sink for tests and dev; oldest events fall off first.
pub struct InMemoryEventSink {
    events: VecDeque<AirfieldEvent>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a sink holding at most `max_events`.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(4096)),
            max_events,
        }
    }

    /// Snapshot of stored events in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<AirfieldEvent> {
        self.events.iter().cloned().collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&mut self, event: AirfieldEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink forwarding events over a crossbeam channel.
///
/// Sends never block; once the receiver is gone events are discarded.
pub struct ChannelEventSink {
    tx: crossbeam_channel::Sender<AirfieldEvent>,
}

impl ChannelEventSink {
    /// Unbounded sink plus the receiving end.
    #[must_use]
    pub fn unbounded() -> (Self, crossbeam_channel::Receiver<AirfieldEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn record(&mut self, event: AirfieldEvent) {
        let _ = self.tx.try_send(event);
    }
}

/// Cloneable handle used by every component to emit events.
#[derive(Clone, Default)]
pub struct EventRecorder {
    sink: Option<Arc<Mutex<Box<dyn EventSink>>>>,
}

impl std::fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRecorder")
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl EventRecorder {
    /// Recorder that only logs.
    #[must_use]
    pub fn log_only() -> Self {
        Self::default()
    }

    /// Recorder that logs and forwards to `sink`.
    #[must_use]
    pub fn new(sink: Box<dyn EventSink>) -> Self {
        Self {
            sink: Some(Arc::new(Mutex::new(sink))),
        }
    }

    /// Recorder sharing an existing sink handle.
    #[must_use]
    pub fn shared(sink: Arc<Mutex<Box<dyn EventSink>>>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Log `event` and hand it to the sink.
    pub fn emit(&self, event: AirfieldEvent) {
        log_event(&event);
        if let Some(sink) = &self.sink {
            sink.lock().record(event);
        }
    }
}

fn log_event(e: &AirfieldEvent) {
    match e.kind {
        EventKind::StatusChanged => tracing::info!(
            previous = ?e.previous_status,
            current = ?e.status,
            meaning = e.reason.as_deref().unwrap_or_default(),
            "airfield status changed"
        ),
        EventKind::MalformedStatus => tracing::warn!(
            message = e.reason.as_deref().unwrap_or_default(),
            "discarded malformed status message"
        ),
        EventKind::Congested => tracing::info!(
            unit = ?e.unit, category = ?e.category, attempt = ?e.attempt,
            "tower congested, holding"
        ),
        EventKind::PermissionDenied => tracing::info!(
            unit = ?e.unit, category = ?e.category, status = ?e.status,
            "not permitted under current status"
        ),
        EventKind::Admitted => tracing::debug!(
            unit = ?e.unit, category = ?e.category, status = ?e.status,
            "admitted by tower"
        ),
        EventKind::RunwayAssigned => tracing::info!(
            unit = ?e.unit, category = ?e.category, runway = ?e.runway,
            "landing on runway"
        ),
        EventKind::NoRunwayAvailable => tracing::info!(
            unit = ?e.unit, category = ?e.category,
            "waiting for a free runway"
        ),
        EventKind::RunwayReleased => tracing::debug!(
            unit = ?e.unit, runway = ?e.runway,
            "runway released, disembarking"
        ),
        EventKind::Completed => tracing::info!(
            unit = ?e.unit, category = ?e.category, attempt = ?e.attempt,
            "operations completed"
        ),
        EventKind::Requeued => tracing::debug!(
            unit = ?e.unit, reason = e.reason.as_deref().unwrap_or_default(),
            "requeued"
        ),
        EventKind::Dropped => tracing::warn!(
            unit = ?e.unit, category = ?e.category, attempt = ?e.attempt,
            reason = e.reason.as_deref().unwrap_or_default(),
            "unit dropped"
        ),
        EventKind::AttemptOverdue => tracing::warn!(
            unit = ?e.unit, attempt = ?e.attempt,
            "attempt exceeded admission timeout"
        ),
        EventKind::BatchTimedOut => tracing::warn!(
            reason = e.reason.as_deref().unwrap_or_default(),
            "batch reached its time limit"
        ),
    }
}
