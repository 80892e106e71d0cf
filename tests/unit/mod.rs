//! Unit tests for individual components

mod builders_test;
mod config_test;
mod error_test;
mod events_test;
mod feed_test;
mod generator_test;
mod policy_test;
mod runtime_test;
mod shared_resources_test;
