//! Tests for runtime adapters and API models

use std::sync::Arc;
use std::time::Duration;

use airfield_scheduler::config::{AirfieldConfig, StageTimings};
use airfield_scheduler::core::{EventRecorder, Spawn, StatusRegister, Unit};
use airfield_scheduler::runtime::{health, Airfield, TokioSpawner};

#[tokio::test]
async fn test_tokio_spawner_runs_tasks() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());
    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        let _ = tx.send("done");
    });
    assert_eq!(rx.await.unwrap(), "done");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_snapshot_and_health_after_batch() {
    let config = AirfieldConfig {
        gate_capacity: 3,
        runway_count: 1,
        queue_capacity: Some(6),
        retry_limit: 100,
        timings: StageTimings::uniform(1),
        ..AirfieldConfig::default()
    };
    let airfield = Airfield::new(
        config,
        Arc::new(StatusRegister::with_value(7)),
        EventRecorder::log_only(),
        TokioSpawner::current().unwrap(),
    );
    let units = vec![Unit::from_size(0, 120), Unit::from_size(1, 60), Unit::from_size(2, 5)];
    let report = airfield.run_batch(units, &[]).await.unwrap();
    assert_eq!(report.succeeded, 3);
    assert!(report.attempts >= 3);
    assert!(!report.batch_id.is_empty());

    assert!(airfield.drain(Duration::from_secs(2)).await);
    let snap = airfield.snapshot();
    assert!(health(&snap).ok);
    assert_eq!(snap.gate_in_flight, 0);
    assert_eq!(snap.runways_occupied, 0);
    assert!(snap.gate_peak <= 3);
}
