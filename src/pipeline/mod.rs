//! The reading-order reconstruction pipeline.
//!
//! This module combines the normalization, clustering, ordering and assembly
//! stages behind [`ReadingOrderPipeline`], together with its configuration
//! and the structured result it returns.

mod config;
pub mod reconstruction;
pub mod result;
pub mod stages;
pub mod validation;

// Re-export the main pipeline components for easier access
pub use config::{ConfigFormat, ConfigLoader, MalformedPolicy, ReadingOrderConfig};
pub use reconstruction::ReadingOrderPipeline;
pub use result::{Reconstruction, ReconstructionResponse, ReconstructionStats};
pub use stages::{NormalizedBatch, SkippedDetection, StageMetrics, StageResult};
