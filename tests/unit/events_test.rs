//! Tests for event sinks and the recorder

use std::sync::Arc;

use airfield_scheduler::core::{
    AirfieldEvent, ChannelEventSink, DropReason, EventKind, EventRecorder, EventSink,
    InMemoryEventSink, StatusChange, Unit, UnitState,
};
use parking_lot::Mutex;

#[test]
fn test_in_memory_sink_keeps_latest() {
    let mut sink = InMemoryEventSink::new(2);
    for kind in [EventKind::Admitted, EventKind::RunwayAssigned, EventKind::Completed] {
        sink.record(AirfieldEvent::new(kind));
    }
    let kinds: Vec<_> = sink.events().into_iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::RunwayAssigned, EventKind::Completed]);
}

#[test]
fn test_shared_recorder_is_observable() {
    let boxed: Box<dyn EventSink> = Box::new(InMemoryEventSink::new(8));
    let sink = Arc::new(Mutex::new(boxed));
    let recorder = EventRecorder::shared(Arc::clone(&sink));
    let (channel, rx) = ChannelEventSink::unbounded();
    let mirror = EventRecorder::new(Box::new(channel));

    let unit = Unit::from_size(3, 75);
    let event = AirfieldEvent::dropped(&unit, 6, DropReason::RetryExhausted);
    recorder.emit(event.clone());
    mirror.emit(event);

    let received = rx.try_recv().unwrap();
    assert_eq!(received.unit, Some(3));
    assert_eq!(received.attempt, Some(6));
    assert_eq!(received.reason.as_deref(), Some("retry_exhausted"));
    assert_eq!(received.kind.unit_state(), Some(UnitState::Dropped));
}

#[test]
fn test_log_only_recorder_accepts_events() {
    let recorder = EventRecorder::log_only();
    recorder.emit(AirfieldEvent::status_changed(StatusChange {
        previous: 0,
        current: 9,
    }));
}

#[test]
fn test_event_serialises_snake_case() {
    let event = AirfieldEvent::new(EventKind::NoRunwayAvailable).with_runway(1);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["kind"], "no_runway_available");
    assert_eq!(json["runway"], 1);
}

#[test]
fn test_unit_events_map_to_states() {
    let cases = [
        (EventKind::Requeued, UnitState::Queued),
        (EventKind::Congested, UnitState::CongestionRejected),
        (EventKind::Admitted, UnitState::Admitted),
        (EventKind::RunwayAssigned, UnitState::RunwayAssigned),
        (EventKind::RunwayReleased, UnitState::Disembarking),
        (EventKind::Completed, UnitState::Completed),
    ];
    for (kind, state) in cases {
        assert_eq!(kind.unit_state(), Some(state));
    }
    assert_eq!(EventKind::BatchTimedOut.unit_state(), None);
}
