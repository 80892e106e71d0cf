//! Tests for builder modules

use airfield_scheduler::builders::AirfieldBuilder;
use airfield_scheduler::config::AirfieldConfig;
use airfield_scheduler::core::{
    AirfieldError, ChannelEventSink, EventKind, EventRecorder, InMemoryEventSink,
};

#[tokio::test]
async fn test_builder_applies_config() {
    let config = AirfieldConfig {
        gate_capacity: 7,
        runway_count: 2,
        ..AirfieldConfig::default()
    };
    let airfield = AirfieldBuilder::new(config)
        .initial_status(4)
        .event_sink(Box::new(InMemoryEventSink::new(16)))
        .build()
        .unwrap();

    let snap = airfield.snapshot();
    assert_eq!(snap.gate_capacity, 7);
    assert_eq!(snap.runway_count, 2);
    assert_eq!(snap.status, 4);
    assert_eq!(airfield.queue().capacity(), 7);
}

#[tokio::test]
async fn test_builder_rejects_invalid_config() {
    let config = AirfieldConfig {
        runway_count: 0,
        ..AirfieldConfig::default()
    };
    let err = AirfieldBuilder::new(config).build().unwrap_err();
    assert!(matches!(err, AirfieldError::InvalidConfig(_)));
}

#[test]
fn test_builder_needs_runtime() {
    let err = AirfieldBuilder::new(AirfieldConfig::default())
        .build()
        .unwrap_err();
    assert!(matches!(err, AirfieldError::Runtime(_)));
}

#[tokio::test]
async fn test_builder_uses_given_recorder() {
    let (sink, rx) = ChannelEventSink::unbounded();
    let airfield = AirfieldBuilder::new(AirfieldConfig::default())
        .events(EventRecorder::new(Box::new(sink)))
        .build()
        .unwrap();

    airfield.set_status(6);
    let event = rx.try_recv().unwrap();
    assert_eq!(event.kind, EventKind::StatusChanged);
    assert_eq!(event.status, Some(6));
}
