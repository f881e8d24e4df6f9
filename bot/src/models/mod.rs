//! Data models for the CI bridge

pub mod build;

pub use build::{BuildStatus, BuildTriggerResult, UNKNOWN};
