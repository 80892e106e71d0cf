//! Runtime adapters and the batch-level facade.

pub mod airfield;
pub mod api;
pub mod tokio_spawner;

pub use airfield::Airfield;
pub use api::{health, AirfieldSnapshot, BatchReport, Health};
pub use tokio_spawner::TokioSpawner;
