//! # Airfield Scheduler
//!
//! Concurrent admission scheduling for units competing for a bounded tower and
//! a fixed set of exclusive runways.
//!
//! Units of categories A, B and C arrive on a bounded queue. A dispatcher hands
//! each one to its own processing task, which must:
//!
//! - **Enter the tower gate**: a non-blocking counter with fixed capacity.
//! - **Pass the admission policy**: the current status value decides which
//!   categories may proceed; unknown values admit everyone.
//! - **Claim a runway**: the lowest-numbered free runway, held exclusively for
//!   the landing.
//!
//! Every rejection backs off and requeues the unit until its retry limit is
//! spent. The status value is fed by an external line-oriented stream.
//!
//! ```rust,ignore
//! use airfield_scheduler::builders::AirfieldBuilder;
//! use airfield_scheduler::config::AirfieldConfig;
//! use airfield_scheduler::infra::{connect_tcp, Arrivals, UnitGenerator};
//!
//! let airfield = AirfieldBuilder::new(AirfieldConfig::from_env()?).build()?;
//! airfield.start_feed(connect_tcp("localhost:8000").await?);
//! let mut generator = UnitGenerator::new();
//! let units = generator.mix(10, 10, 10);
//! let gaps = generator.gaps(Arrivals::between_ms(3_000, 5_000), units.len());
//! let report = airfield.run_batch(units, &gaps).await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```
//!
//! For complete scenarios, see `tests/airfield_scenarios_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling: gate, runways, status, policy, queue and unit processing.
pub mod core;
/// Configuration models for capacities, timings and limits.
pub mod config;
/// Builders to construct an airfield from configuration.
pub mod builders;
/// External collaborators: status feed and unit generator.
pub mod infra;
/// Tokio spawner, the airfield facade, and report DTOs.
pub mod runtime;
/// Shared utilities.
pub mod util;
