//! Builders to construct an airfield from configuration.

pub mod airfield_builder;

pub use airfield_builder::AirfieldBuilder;
