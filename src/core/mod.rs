//! Core scheduling abstractions: gate, runways, status, policy, and the
//! per-unit state machine.

pub mod dispatcher;
pub mod error;
pub mod events;
pub mod ledger;
pub mod policy;
pub mod processor;
pub mod runway_pool;
pub mod status;
pub mod tower_gate;
pub mod tracker;
pub mod unit;
pub mod unit_queue;

pub use dispatcher::{DispatchLimits, Dispatcher, Spawn};
pub use error::{AirfieldError, AppResult};
pub use events::{
    AirfieldEvent, ChannelEventSink, EventKind, EventRecorder, EventSink, InMemoryEventSink,
};
pub use ledger::{AttemptLedger, DropReason, LedgerTally, UnitFate, UnitRecord};
pub use policy::{admit, permitted};
pub use processor::{AttemptOutcome, RequeueCause, UnitProcessor};
pub use runway_pool::{RunwayId, RunwayLease, RunwayPool};
pub use status::{describe_status, StatusChange, StatusRegister, StatusValue};
pub use tower_gate::{GateSlot, TowerGate};
pub use tracker::{TaskTicket, TaskTracker};
pub use unit::{Category, Unit, UnitId, UnitState};
pub use unit_queue::UnitQueue;
