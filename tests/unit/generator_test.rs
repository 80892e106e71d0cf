//! Tests for the unit generator

use airfield_scheduler::core::{Category, UnitQueue};
use airfield_scheduler::infra::{submit_paced, Arrivals, UnitGenerator};

#[test]
fn test_standard_mix() {
    let units = UnitGenerator::seeded(2024).mix(10, 10, 10);
    assert_eq!(units.len(), 30);
    for category in Category::ALL {
        let of_category: Vec<_> = units.iter().filter(|u| u.category() == category).collect();
        assert_eq!(of_category.len(), 10);
        for unit in of_category {
            assert_eq!(Category::from_size(unit.size()), category);
        }
    }
}

#[test]
fn test_mix_is_shuffled() {
    let units = UnitGenerator::seeded(5).mix(20, 20, 20);
    let in_id_order = units.windows(2).all(|w| w[0].id() < w[1].id());
    assert!(!in_id_order);
}

#[tokio::test(start_paused = true)]
async fn test_paced_submission_fills_queue() {
    let queue = UnitQueue::new(8);
    let mut generator = UnitGenerator::seeded(11);
    let units = generator.mix(2, 2, 2);
    let gaps = generator.gaps(Arrivals::between_ms(3_000, 5_000), units.len());

    let started = tokio::time::Instant::now();
    let rejected = submit_paced(&queue, units, &gaps).await;
    assert!(rejected.is_empty());
    assert_eq!(queue.len(), 6);
    assert!(started.elapsed() >= std::time::Duration::from_secs(18));
}
