//! Traffic units and their admission category.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a unit.
pub type UnitId = u64;

/// Admission category, derived from the unit's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Large units (size above 100).
    A,
    /// Medium units (size 50 through 100).
    B,
    /// Small units (size below 50).
    C,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::C];

    /// Classify a size: `> 100` is A, `50..=100` is B, anything else is C.
    ///
    /// This is the only place the thresholds live; every construction path
    /// that derives a category goes through here.
    #[must_use]
    pub const fn from_size(size: u32) -> Self {
        if size > 100 {
            Self::A
        } else if size >= 50 {
            Self::B
        } else {
            Self::C
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        };
        f.write_str(label)
    }
}

/// An arriving traffic unit. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    id: UnitId,
    category: Category,
    size: u32,
}

impl Unit {
    /// Create a unit whose category is derived from `size`.
    #[must_use]
    pub const fn from_size(id: UnitId, size: u32) -> Self {
        Self {
            id,
            category: Category::from_size(size),
            size,
        }
    }

    /// Create a unit with an explicit category.
    ///
    /// The caller is trusted; the size is not re-checked against the category.
    #[must_use]
    pub const fn with_category(id: UnitId, category: Category, size: u32) -> Self {
        Self { id, category, size }
    }

    /// Unit identifier.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Admission category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Size attribute (passenger count).
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {} (cat {})", self.id, self.category)
    }
}

/// Observable states of a unit during one processing attempt.
///
/// Entering the gate never blocks, so it has no state of its own; landing is
/// the time spent in [`UnitState::RunwayAssigned`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    /// Back in the unit queue after a rejected attempt.
    Queued,
    /// Gate was full.
    CongestionRejected,
    /// Admission policy said no.
    PermissionDenied,
    /// Inside the gate and permitted.
    Admitted,
    /// Holding a runway and landing on it.
    RunwayAssigned,
    /// Every runway was taken.
    NoRunwayAvailable,
    /// Runway released, still holding the gate.
    Disembarking,
    /// Finished successfully.
    Completed,
    /// Permanently removed from processing.
    Dropped,
}
