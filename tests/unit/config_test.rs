//! Tests for configuration validation

use std::collections::HashMap;
use std::time::Duration;

use airfield_scheduler::config::{AirfieldConfig, StageTimings};

#[test]
fn test_default_config_is_valid() {
    let cfg = AirfieldConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.gate_capacity, 5);
    assert_eq!(cfg.runway_count, 3);
    assert_eq!(cfg.retry_limit, 5);
    assert_eq!(cfg.effective_queue_capacity(), 5);
    assert_eq!(cfg.attempt_timeout(), Duration::from_secs(30));
    assert_eq!(cfg.batch_timeout(), Duration::from_secs(60));
}

#[test]
fn test_default_timings() {
    let t = StageTimings::default();
    assert_eq!(t.tower_handling(), Duration::from_secs(3));
    assert_eq!(t.landing(), Duration::from_secs(4));
    assert_eq!(t.disembark(), Duration::from_secs(3));
    assert_eq!(t.congestion_backoff(), Duration::from_secs(5));
    assert_eq!(t.denial_backoff(), Duration::from_secs(3));
    assert_eq!(t.dispatch_pacing(), Duration::from_secs(2));
}

#[test]
fn test_zero_values_rejected() {
    let cases: [fn(&mut AirfieldConfig); 6] = [
        |c| c.gate_capacity = 0,
        |c| c.runway_count = 0,
        |c| c.queue_capacity = Some(0),
        |c| c.retry_limit = 0,
        |c| c.attempt_timeout_ms = 0,
        |c| c.batch_timeout_ms = 0,
    ];
    for mutate in cases {
        let mut cfg = AirfieldConfig::default();
        mutate(&mut cfg);
        assert!(cfg.validate().is_err(), "{cfg:?} should be invalid");
    }
}

#[test]
fn test_json_partial_uses_defaults() {
    let cfg = AirfieldConfig::from_json_str(
        r#"{"gate_capacity": 12, "queue_capacity": 20, "timings": {"landing_ms": 10}}"#,
    )
    .unwrap();
    assert_eq!(cfg.gate_capacity, 12);
    assert_eq!(cfg.effective_queue_capacity(), 20);
    assert_eq!(cfg.runway_count, 3);
    assert_eq!(cfg.timings.landing_ms, 10);
    assert_eq!(cfg.timings.tower_handling_ms, 3_000);
}

#[test]
fn test_json_invalid_is_rejected() {
    assert!(AirfieldConfig::from_json_str("{not json").is_err());
    assert!(AirfieldConfig::from_json_str(r#"{"runway_count": 0}"#).is_err());
}

#[test]
fn test_lookup_overrides_and_errors() {
    let vars: HashMap<&str, &str> = [
        ("AIRFIELD_RUNWAY_COUNT", "4"),
        ("AIRFIELD_QUEUE_CAPACITY", "9"),
        ("AIRFIELD_DENIAL_BACKOFF_MS", " 15 "),
    ]
    .into_iter()
    .collect();
    let cfg = AirfieldConfig::from_lookup(|k| vars.get(k).map(ToString::to_string)).unwrap();
    assert_eq!(cfg.runway_count, 4);
    assert_eq!(cfg.queue_capacity, Some(9));
    assert_eq!(cfg.timings.denial_backoff_ms, 15);

    let err = AirfieldConfig::from_lookup(|k| {
        (k == "AIRFIELD_GATE_CAPACITY").then(|| "many".to_string())
    })
    .unwrap_err();
    assert!(err.contains("AIRFIELD_GATE_CAPACITY"));
}
