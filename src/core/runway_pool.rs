//! Fixed pool of exclusive-use runways.
//!
//! Each runway carries its own `parking_lot::Mutex<bool>`; there is no
//! pool-wide lock, so concurrent scans only contend on the runway they are
//! looking at. A claim happens under that runway's lock, which is what keeps
//! two units from both observing it free.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::AirfieldError;

/// Runway identifier (index into the pool, ascending from 0).
pub type RunwayId = usize;

#[derive(Debug)]
struct Runway {
    occupied: Mutex<bool>,
}

/// A fixed-size set of runways. Never grows or shrinks after construction.
#[derive(Debug)]
pub struct RunwayPool {
    runways: Vec<Runway>,
}

impl RunwayPool {
    /// Create `count` free runways with ids `0..count`.
    #[must_use]
    pub fn new(count: usize) -> Self {
        let runways = (0..count)
            .map(|_| Runway {
                occupied: Mutex::new(false),
            })
            .collect();
        Self { runways }
    }

    /// Number of runways.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runways.len()
    }

    /// True if the pool has no runways.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runways.is_empty()
    }

    /// Claim the lowest-numbered free runway, or `None` if all are taken.
    pub fn acquire_first_free(&self) -> Option<RunwayId> {
        for (id, runway) in self.runways.iter().enumerate() {
            let mut occupied = runway.occupied.lock();
            if !*occupied {
                *occupied = true;
                return Some(id);
            }
        }
        None
    }

    /// Mark a runway free. Unknown ids are ignored.
    pub fn release(&self, id: RunwayId) {
        if let Some(runway) = self.runways.get(id) {
            let mut occupied = runway.occupied.lock();
            if !*occupied {
                tracing::warn!(runway = id, "released a runway that was not occupied");
            }
            *occupied = false;
        }
    }

    /// Claim the first free runway as a lease that releases itself on drop.
    pub fn lease_first_free(self: &Arc<Self>) -> Option<RunwayLease> {
        self.acquire_first_free().map(|id| RunwayLease {
            pool: Arc::clone(self),
            id,
        })
    }

    /// Lease the first free runway or report that none is available.
    ///
    /// # Errors
    ///
    /// [`AirfieldError::ResourceUnavailable`] when every runway is occupied.
    pub fn lease(self: &Arc<Self>) -> Result<RunwayLease, AirfieldError> {
        self.lease_first_free()
            .ok_or(AirfieldError::ResourceUnavailable)
    }

    /// Whether a runway is currently claimed.
    #[must_use]
    pub fn is_occupied(&self, id: RunwayId) -> bool {
        self.runways
            .get(id)
            .is_some_and(|runway| *runway.occupied.lock())
    }

    /// Number of claimed runways at this instant.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.runways
            .iter()
            .filter(|runway| *runway.occupied.lock())
            .count()
    }
}

/// Claim on one runway. Dropping it releases the runway.
#[derive(Debug)]
pub struct RunwayLease {
    pool: Arc<RunwayPool>,
    id: RunwayId,
}

impl RunwayLease {
    /// The claimed runway.
    #[must_use]
    pub const fn id(&self) -> RunwayId {
        self.id
    }
}

impl Drop for RunwayLease {
    fn drop(&mut self) {
        self.pool.release(self.id);
    }
}
