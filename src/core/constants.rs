//! Constants used throughout the reconstruction pipeline.

/// Default vertical distance, in pixels, under which two fragments share a line.
pub const DEFAULT_Y_THRESHOLD: f32 = 10.0;

/// Batches with more independent payloads than this are reconstructed in parallel.
pub const DEFAULT_BATCH_PARALLEL_THRESHOLD: usize = 4;

/// Separator placed between fragments of the same line.
pub const FRAGMENT_SEPARATOR: &str = " ";

/// Separator placed between lines of the assembled text.
pub const LINE_SEPARATOR: &str = "\n";

/// Confidence assigned when the recognizer did not report one.
pub const MISSING_CONFIDENCE: f32 = 0.0;
