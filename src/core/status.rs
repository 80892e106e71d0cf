//! Status register holding the current admission mode.
//!
//! The register is written only by the status feed consumer and read by every
//! unit processor. Writes and reads go through the same `parking_lot::Mutex`,
//! so a reader always sees a value that some write actually stored.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::AirfieldError;

/// Raw status value. Expected in `0..=9`; anything else is accepted and
/// handled by the policy's fail-open default.
pub type StatusValue = i64;

/// A reported transition of the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Value before the write.
    pub previous: StatusValue,
    /// Value after the write.
    pub current: StatusValue,
}

#[derive(Debug)]
struct StatusState {
    value: StatusValue,
    previous: StatusValue,
    reported_initial: bool,
}

/// Current admission-state value plus the previous one for change detection.
#[derive(Debug)]
pub struct StatusRegister {
    state: Mutex<StatusState>,
}

impl Default for StatusRegister {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusRegister {
    /// Create a register holding the implicit default of 0.
    #[must_use]
    pub fn new() -> Self {
        Self::with_value(0)
    }

    /// Create a register with a preset value. The first write is still
    /// reported regardless of whether it differs.
    #[must_use]
    pub const fn with_value(value: StatusValue) -> Self {
        Self {
            state: Mutex::new(StatusState {
                value,
                previous: value,
                reported_initial: false,
            }),
        }
    }

    /// Current value.
    pub fn get(&self) -> StatusValue {
        self.state.lock().value
    }

    /// Value held before the most recent write.
    pub fn previous(&self) -> StatusValue {
        self.state.lock().previous
    }

    /// Overwrite the value.
    ///
    /// Returns the transition when it should be reported: whenever the value
    /// changes, and once for the very first write.
    pub fn set(&self, value: StatusValue) -> Option<StatusChange> {
        let mut state = self.state.lock();
        let previous = state.value;
        state.previous = previous;
        state.value = value;
        if previous != value || !state.reported_initial {
            state.reported_initial = true;
            Some(StatusChange {
                previous,
                current: value,
            })
        } else {
            None
        }
    }

    /// Apply one feed message.
    ///
    /// Blank messages yield `Ok(None)` and leave the register untouched, as do
    /// integer writes that repeat the current value. Non-integer messages are
    /// rejected without touching the register.
    ///
    /// # Errors
    ///
    /// Returns [`AirfieldError::MalformedFeedMessage`] if the trimmed message
    /// does not parse as an integer.
    pub fn apply_message(&self, message: &str) -> Result<Option<StatusChange>, AirfieldError> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let value: StatusValue = trimmed
            .parse()
            .map_err(|_| AirfieldError::MalformedFeedMessage(trimmed.to_string()))?;
        Ok(self.set(value))
    }
}

/// Human-readable meaning of a status value.
#[must_use]
pub const fn describe_status(value: StatusValue) -> &'static str {
    match value {
        0 => "airfield idle",
        1 => "only category A permitted",
        2 => "only category B permitted",
        3 => "only category C permitted",
        4 => "priority for category A",
        5 => "priority for category B",
        6 => "priority for category C",
        7 | 8 => "holding previous state",
        9 => "temporarily closed",
        _ => "undefined status",
    }
}
