//! Error types for scheduler operations.

use thiserror::Error;

use crate::core::status::StatusValue;
use crate::core::unit::Category;

/// Errors produced by scheduler components.
///
/// Per-unit failures (congestion, denial, overflow, exhaustion) are reported
/// through these variants at component boundaries but never escape a batch:
/// the processor turns them into terminal fates recorded in the ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AirfieldError {
    /// Tower gate is at capacity.
    #[error("tower congested")]
    Congestion,
    /// Admission policy rejected the category under the current status.
    #[error("category {category} not permitted under status {status}")]
    PolicyDenied {
        /// Category of the rejected unit.
        category: Category,
        /// Status value the decision was made against.
        status: StatusValue,
    },
    /// Every runway is occupied.
    #[error("no runway available")]
    ResourceUnavailable,
    /// Requeue target is full.
    #[error("unit queue full")]
    QueueOverflow,
    /// Unit queue has been closed.
    #[error("unit queue closed")]
    QueueClosed,
    /// Attempt counter went past the retry limit.
    #[error("retry limit exhausted after {attempts} attempts")]
    RetryExhausted {
        /// Attempts recorded for the unit, including the rejected one.
        attempts: u32,
    },
    /// Status feed message was not an integer.
    #[error("malformed status message: {0:?}")]
    MalformedFeedMessage(String),
    /// Batch wall-clock budget was exceeded.
    #[error("batch timed out")]
    Timeout,
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Status feed transport failure.
    #[error("status feed error: {0}")]
    Feed(String),
    /// No async runtime was available to run tasks on.
    #[error("runtime unavailable: {0}")]
    Runtime(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
