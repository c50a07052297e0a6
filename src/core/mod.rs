//! The core module of the reconstruction pipeline.
//!
//! This module contains the fundamental pieces shared by every stage:
//! - Configuration validation and parallel policy
//! - Constants used throughout the pipeline
//! - Error handling
//!
//! It also provides the logging setup used by binaries and examples.

pub mod config;
pub mod constants;
pub mod errors;

pub use config::{ConfigError, ConfigValidator, ConfigValidatorExt, ParallelPolicy};
pub use constants::*;
pub use errors::{ProcessingStage, ReadingOrderError, ReadingOrderResult};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
