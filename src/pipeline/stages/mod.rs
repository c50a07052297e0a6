//! Stages of the reconstruction pipeline.
//!
//! Data flows strictly forward through four stages:
//!
//! 1. [`normalize`] - raw detections to fragments with canonical quads
//! 2. [`cluster`] - fragments to lines by vertical proximity
//! 3. [`order`] - fragments within each line, left to right
//! 4. [`assemble`] - lines to the final text
//!
//! No stage depends on a later one.

pub mod assemble;
pub mod cluster;
pub mod normalize;
pub mod order;
mod types;

pub use assemble::assemble;
pub use cluster::{cluster_lines, cluster_stage};
pub use normalize::{NormalizedBatch, SkippedDetection, normalize_all, normalize_detection};
pub use order::{order_line, order_lines};
pub use types::{StageMetrics, StageResult};
