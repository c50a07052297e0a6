//! Input adapters.
//!
//! Adapters bridge the gap between what upstream recognizers emit and the
//! uniform detection sequence the pipeline consumes.

pub mod recognizer_output;

pub use recognizer_output::{AggregateOutput, RecognizerOutput};
