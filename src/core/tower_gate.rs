//! Tower gate: bounded count of units inside the processing pipeline.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::AirfieldError;

#[derive(Debug, Default)]
struct GateState {
    in_flight: u32,
    peak: u32,
}

/// Non-blocking concurrency limiter.
///
/// `in_flight` only changes under the gate's own lock. Every successful
/// [`TowerGate::try_enter`] must be paired with exactly one
/// [`TowerGate::exit`]; [`GateSlot`] does the pairing on drop.
#[derive(Debug)]
pub struct TowerGate {
    capacity: u32,
    state: Mutex<GateState>,
}

impl TowerGate {
    /// Create an empty gate.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            state: Mutex::new(GateState::default()),
        }
    }

    /// Enter if below capacity. Never blocks.
    pub fn try_enter(&self) -> bool {
        let mut state = self.state.lock();
        if state.in_flight >= self.capacity {
            return false;
        }
        state.in_flight += 1;
        state.peak = state.peak.max(state.in_flight);
        true
    }

    /// Leave the gate.
    pub fn exit(&self) {
        let mut state = self.state.lock();
        if state.in_flight == 0 {
            tracing::error!("tower gate exit without matching entry");
            return;
        }
        state.in_flight -= 1;
    }

    /// Enter and get a slot that exits on drop.
    pub fn try_slot(self: &Arc<Self>) -> Option<GateSlot> {
        self.try_enter().then(|| GateSlot {
            gate: Arc::clone(self),
        })
    }

    /// Enter or report congestion.
    ///
    /// # Errors
    ///
    /// [`AirfieldError::Congestion`] when the gate is full.
    pub fn enter(self: &Arc<Self>) -> Result<GateSlot, AirfieldError> {
        self.try_slot().ok_or(AirfieldError::Congestion)
    }

    /// Configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Units currently inside.
    #[must_use]
    pub fn in_flight(&self) -> u32 {
        self.state.lock().in_flight
    }

    /// Highest `in_flight` ever observed.
    #[must_use]
    pub fn peak(&self) -> u32 {
        self.state.lock().peak
    }
}

/// Occupancy of one gate slot; exits the gate when dropped.
#[derive(Debug)]
pub struct GateSlot {
    gate: Arc<TowerGate>,
}

impl Drop for GateSlot {
    fn drop(&mut self) {
        self.gate.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_capacity_bound() {
        let gate = TowerGate::new(2);
        assert!(gate.try_enter());
        assert!(gate.try_enter());
        assert!(!gate.try_enter());
        assert_eq!(gate.in_flight(), 2);

        gate.exit();
        assert!(gate.try_enter());
        assert_eq!(gate.peak(), 2);
    }

    #[test]
    fn test_enter_reports_congestion() {
        let gate = Arc::new(TowerGate::new(1));
        let _slot = gate.enter().unwrap();
        assert_eq!(gate.enter().unwrap_err(), AirfieldError::Congestion);
    }

    #[test]
    fn test_exit_without_entry_does_not_underflow() {
        let gate = TowerGate::new(1);
        gate.exit();
        assert_eq!(gate.in_flight(), 0);
    }

    #[test]
    fn test_slot_exits_on_drop() {
        let gate = Arc::new(TowerGate::new(1));
        let slot = gate.try_slot().expect("slot");
        assert!(gate.try_slot().is_none());
        drop(slot);
        assert_eq!(gate.in_flight(), 0);
    }

    #[test]
    fn test_concurrent_entries_never_exceed_capacity() {
        let gate = Arc::new(TowerGate::new(3));
        let mut handles = vec![];
        for _ in 0..8 {
            let gate = Arc::clone(&gate);
            handles.push(thread::spawn(move || {
                for _ in 0..1_000 {
                    if let Some(slot) = gate.try_slot() {
                        thread::yield_now();
                        drop(slot);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(gate.peak() <= 3);
        assert_eq!(gate.in_flight(), 0);
    }
}
