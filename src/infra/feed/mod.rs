//! Status feed sources and the consumer loop that applies them.
//!
//! A source yields raw text messages; [`run_status_feed`] parses each one and
//! writes valid integers into the [`StatusRegister`]. Malformed messages are
//! reported and skipped, leaving the register untouched.

pub mod line;
pub mod scripted;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::events::{AirfieldEvent, EventKind, EventRecorder};
use crate::core::status::StatusRegister;
use crate::core::AirfieldError;

pub use line::{connect_tcp, LineFeed};
pub use scripted::ScriptedFeed;

/// A stream of raw status messages.
#[async_trait]
pub trait StatusSource: Send {
    /// Next message, or `None` once the source has ended.
    ///
    /// # Errors
    ///
    /// [`AirfieldError::Feed`] on a transport failure.
    async fn next_message(&mut self) -> Result<Option<String>, AirfieldError>;
}

/// Counters for one run of the feed consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedStats {
    /// Integers written to the register.
    pub applied: u64,
    /// Messages that failed to parse.
    pub malformed: u64,
    /// Blank messages.
    pub ignored: u64,
}

/// Apply every message from `source` to `register` until the source ends.
///
/// # Errors
///
/// Propagates the source's transport error; counters gathered so far are lost
/// with it, but every value already applied stays in the register.
pub async fn run_status_feed<S>(
    source: &mut S,
    register: &StatusRegister,
    events: &EventRecorder,
) -> Result<FeedStats, AirfieldError>
where
    S: StatusSource + ?Sized,
{
    let mut stats = FeedStats::default();
    while let Some(message) = source.next_message().await? {
        match register.apply_message(&message) {
            Ok(Some(change)) => {
                stats.applied += 1;
                events.emit(AirfieldEvent::status_changed(change));
            }
            Ok(None) if message.trim().is_empty() => stats.ignored += 1,
            Ok(None) => stats.applied += 1,
            Err(err) => {
                stats.malformed += 1;
                let reason = match err {
                    AirfieldError::MalformedFeedMessage(raw) => raw,
                    other => other.to_string(),
                };
                events.emit(AirfieldEvent::new(EventKind::MalformedStatus).with_reason(reason));
            }
        }
    }
    tracing::info!(
        applied = stats.applied,
        malformed = stats.malformed,
        ignored = stats.ignored,
        "status feed ended"
    );
    Ok(stats)
}
