//! Unit generator and paced submission.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::core::unit::{Category, Unit, UnitId};
use crate::core::unit_queue::UnitQueue;

/// Inter-arrival delay between submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arrivals {
    /// Submit back to back.
    #[default]
    Immediate,
    /// Constant gap.
    Fixed(Duration),
    /// Uniform gap in `min..=max`.
    Between {
        /// Shortest gap.
        min: Duration,
        /// Longest gap.
        max: Duration,
    },
}

impl Arrivals {
    /// Uniform gap between `min_ms` and `max_ms` milliseconds.
    #[must_use]
    pub const fn between_ms(min_ms: u64, max_ms: u64) -> Self {
        Self::Between {
            min: Duration::from_millis(min_ms),
            max: Duration::from_millis(max_ms),
        }
    }

    /// Draw one gap.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        match *self {
            Self::Immediate => Duration::ZERO,
            Self::Fixed(gap) => gap,
            Self::Between { min, max } if max <= min => min,
            Self::Between { min, max } => {
                let ms = rng.random_range(duration_ms(min)..=duration_ms(max));
                Duration::from_millis(ms)
            }
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Produces units with sizes drawn from each category's range.
#[derive(Debug)]
pub struct UnitGenerator {
    rng: StdRng,
}

impl Default for UnitGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitGenerator {
    /// Generator seeded from the OS.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible generator.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Size range that maps to `category`.
    #[must_use]
    pub const fn size_range(category: Category) -> RangeInclusive<u32> {
        match category {
            Category::A => 101..=200,
            Category::B => 50..=100,
            Category::C => 1..=49,
        }
    }

    /// Draw a size belonging to `category`.
    pub fn sample_size(&mut self, category: Category) -> u32 {
        self.rng.random_range(Self::size_range(category))
    }

    /// `a` category-A, `b` category-B and `c` category-C units in random
    /// order. Ids run from 0 in category order before shuffling.
    pub fn mix(&mut self, a: usize, b: usize, c: usize) -> Vec<Unit> {
        let plan = [(Category::A, a), (Category::B, b), (Category::C, c)];
        let mut units = Vec::with_capacity(a + b + c);
        let mut next_id: UnitId = 0;
        for (category, count) in plan {
            for _ in 0..count {
                let size = self.sample_size(category);
                units.push(Unit::from_size(next_id, size));
                next_id += 1;
            }
        }
        units.shuffle(&mut self.rng);
        units
    }

    /// Gaps for `count` submissions under `arrivals`.
    pub fn gaps(&mut self, arrivals: Arrivals, count: usize) -> Vec<Duration> {
        (0..count).map(|_| arrivals.sample(&mut self.rng)).collect()
    }
}

/// Submit `units` in order, waiting `gaps[i]` before unit `i`.
///
/// Submission blocks while the queue is full. Units the queue refused because
/// it was closed are returned; everything else was enqueued.
pub async fn submit_paced(
    queue: &UnitQueue,
    units: Vec<Unit>,
    gaps: &[Duration],
) -> Vec<Unit> {
    let mut rejected = Vec::new();
    for (index, unit) in units.into_iter().enumerate() {
        if let Some(gap) = gaps.get(index).filter(|g| !g.is_zero()) {
            tokio::time::sleep(*gap).await;
        }
        match queue.enqueue(unit).await {
            Ok(()) => tracing::debug!(unit = unit.id(), category = %unit.category(), "arrived"),
            Err(_) => rejected.push(unit),
        }
    }
    if !rejected.is_empty() {
        tracing::warn!(count = rejected.len(), "units rejected by a closed queue");
    }
    rejected
}
