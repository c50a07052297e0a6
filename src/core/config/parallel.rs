//! Parallel processing configuration for batch reconstruction.

use crate::core::constants::DEFAULT_BATCH_PARALLEL_THRESHOLD;
use serde::{Deserialize, Serialize};

/// Controls when independent payloads of a batch are reconstructed in parallel.
///
/// Reconstruction of one payload is always single-threaded; parallelism only
/// applies across payloads, which share no state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of threads to use for parallel processing.
    /// If None, rayon's global pool is used (typically one thread per core).
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Batches with at most this many payloads are processed sequentially.
    #[serde(default = "ParallelPolicy::default_batch_threshold")]
    pub batch_threshold: usize,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Set the batch processing threshold.
    pub fn with_batch_threshold(mut self, threshold: usize) -> Self {
        self.batch_threshold = threshold;
        self
    }

    /// Returns true if a batch of `item_count` payloads should run in parallel.
    pub fn should_use_parallel(&self, item_count: usize) -> bool {
        item_count > self.batch_threshold
    }

    fn default_batch_threshold() -> usize {
        DEFAULT_BATCH_PARALLEL_THRESHOLD
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: None,
            batch_threshold: Self::default_batch_threshold(),
        }
    }
}
