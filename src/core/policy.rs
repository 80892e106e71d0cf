//! Admission policy: which categories may proceed under which status.

use crate::core::status::StatusValue;
use crate::core::unit::Category;
use crate::core::AirfieldError;

/// Decide whether a unit of `category` may proceed under `status`.
///
/// | status | permitted |
/// |---|---|
/// | 0, 9 | none |
/// | 1, 4 | A only |
/// | 2, 5 | B only |
/// | 3, 6 | C only |
/// | 7, 8 | all |
/// | other | all (fail-open) |
#[must_use]
pub const fn permitted(category: Category, status: StatusValue) -> bool {
    match status {
        0 | 9 => false,
        1 | 4 => matches!(category, Category::A),
        2 | 5 => matches!(category, Category::B),
        3 | 6 => matches!(category, Category::C),
        _ => true,
    }
}

/// [`permitted`] as a `Result`.
///
/// # Errors
///
/// [`AirfieldError::PolicyDenied`] naming the category and status.
pub const fn admit(category: Category, status: StatusValue) -> Result<(), AirfieldError> {
    if permitted(category, status) {
        Ok(())
    } else {
        Err(AirfieldError::PolicyDenied { category, status })
    }
}
