//! External collaborators: the status feed and the unit generator.

pub mod feed;
pub mod generator;

pub use feed::{connect_tcp, run_status_feed, FeedStats, LineFeed, ScriptedFeed, StatusSource};
pub use generator::{submit_paced, Arrivals, UnitGenerator};
