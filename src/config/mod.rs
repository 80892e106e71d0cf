//! Configuration models for the airfield: capacities, timings, and limits.

pub mod airfield;

pub use airfield::{AirfieldConfig, StageTimings};
