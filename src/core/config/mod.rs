//! Configuration management for the reconstruction pipeline.
//!
//! This module provides validation traits and shared configuration types.

pub mod errors;
pub mod parallel;

pub use errors::{ConfigError, ConfigValidator, ConfigValidatorExt};
pub use parallel::ParallelPolicy;
