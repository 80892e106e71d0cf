//! Tests for the gate, runway pool and unit queue under concurrency

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use airfield_scheduler::core::{AirfieldError, RunwayPool, TowerGate, Unit, UnitQueue};
use futures::future::join_all;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_gate_bound_holds_across_tasks() {
    let gate = Arc::new(TowerGate::new(5));
    let admitted = Arc::new(AtomicUsize::new(0));
    let tasks = (0..64).map(|_| {
        let gate = Arc::clone(&gate);
        let admitted = Arc::clone(&admitted);
        tokio::spawn(async move {
            for _ in 0..20 {
                if let Ok(slot) = gate.enter() {
                    admitted.fetch_add(1, Ordering::Relaxed);
                    tokio::time::sleep(Duration::from_micros(200)).await;
                    drop(slot);
                } else {
                    tokio::task::yield_now().await;
                }
            }
        })
    });
    for result in join_all(tasks).await {
        result.unwrap();
    }
    assert!(gate.peak() <= 5);
    assert!(admitted.load(Ordering::Relaxed) > 0);
    assert_eq!(gate.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_runways_are_exclusive() {
    let pool = Arc::new(RunwayPool::new(3));
    let holders: Arc<Vec<AtomicUsize>> = Arc::new((0..3).map(|_| AtomicUsize::new(0)).collect());
    let tasks = (0..32).map(|_| {
        let pool = Arc::clone(&pool);
        let holders = Arc::clone(&holders);
        tokio::spawn(async move {
            for _ in 0..50 {
                if let Ok(lease) = pool.lease() {
                    let before = holders[lease.id()].fetch_add(1, Ordering::AcqRel);
                    assert_eq!(before, 0, "runway {} double-booked", lease.id());
                    tokio::task::yield_now().await;
                    holders[lease.id()].fetch_sub(1, Ordering::AcqRel);
                }
            }
        })
    });
    for result in join_all(tasks).await {
        result.unwrap();
    }
    assert_eq!(pool.occupied_count(), 0);
}

#[tokio::test]
async fn test_queue_overflow_and_close() {
    let queue = UnitQueue::new(2);
    queue.try_enqueue(Unit::from_size(0, 10)).unwrap();
    queue.try_enqueue(Unit::from_size(1, 10)).unwrap();
    assert_eq!(
        queue.try_enqueue(Unit::from_size(2, 10)),
        Err(AirfieldError::QueueOverflow)
    );
    assert_eq!(queue.dequeue().await.map(|u| u.id()), Some(0));

    queue.close().await;
    assert!(queue.is_closed());
    assert_eq!(
        queue.try_enqueue(Unit::from_size(3, 10)),
        Err(AirfieldError::QueueClosed)
    );
    assert_eq!(queue.dequeue().await, None);
}
