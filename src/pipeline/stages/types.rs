//! Per-stage output wrapper and counters.

use crate::core::ProcessingStage;
use std::time::{Duration, Instant};

/// A stage's output together with what the stage measured.
#[derive(Debug, Clone)]
pub struct StageResult<T> {
    pub data: T,
    pub metrics: StageMetrics,
}

impl<T> StageResult<T> {
    pub fn new(data: T, metrics: StageMetrics) -> Self {
        Self { data, metrics }
    }
}

/// Item counts and elapsed time for one stage run.
///
/// `produced` counts the stage's own output units: fragments for
/// normalization, lines for clustering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageMetrics {
    pub stage: ProcessingStage,
    pub consumed: usize,
    pub produced: usize,
    pub rejected: usize,
    pub elapsed: Duration,
}

impl StageMetrics {
    /// Closes the measurement of a stage that started at `started`.
    pub fn finish(
        stage: ProcessingStage,
        started: Instant,
        consumed: usize,
        produced: usize,
        rejected: usize,
    ) -> Self {
        Self {
            stage,
            consumed,
            produced,
            rejected,
            elapsed: started.elapsed(),
        }
    }
}
