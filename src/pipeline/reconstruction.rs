//! The reconstruction boundary.
//!
//! [`ReadingOrderPipeline`] runs decoded detections through the four stages
//! and always hands back a [`ReconstructionResponse`]: stage errors and
//! panics inside the core are turned into `success: false` responses.

use super::config::ReadingOrderConfig;
use super::result::{Reconstruction, ReconstructionResponse, ReconstructionStats};
use super::stages::{assemble, cluster_stage, normalize_all, order_lines};
use crate::core::config::ConfigValidatorExt;
use crate::core::{ProcessingStage, ReadingOrderError, ReadingOrderResult};
use crate::domain::{IndexedDetection, RawDetection, RecognizerOutput};
use rayon::prelude::*;
use serde_json::Value;
use std::any::Any;
use std::cell::Cell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Reconstructs reading order from recognizer detections.
///
/// The pipeline holds only its configuration, so one instance can serve any
/// number of calls, including concurrent ones.
///
/// # Example
///
/// ```rust
/// use oar_reading_order::pipeline::ReadingOrderPipeline;
/// use serde_json::json;
///
/// let pipeline = ReadingOrderPipeline::default();
/// let response = pipeline.reconstruct_value(json!({
///     "rec_texts": ["World", "Hello"],
///     "rec_scores": [0.8, 0.9],
///     "rec_boxes": [[50, 2, 90, 17], [0, 0, 40, 15]]
/// }));
///
/// assert!(response.success);
/// assert_eq!(response.text(), "Hello World");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReadingOrderPipeline {
    config: ReadingOrderConfig,
}

impl ReadingOrderPipeline {
    /// Creates a pipeline after validating `config`.
    pub fn new(config: ReadingOrderConfig) -> ReadingOrderResult<Self> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    /// The pipeline's configuration.
    pub fn config(&self) -> &ReadingOrderConfig {
        &self.config
    }

    /// Reconstructs a sequence of detections.
    ///
    /// Malformed detections are skipped. An empty sequence succeeds with
    /// empty text and data.
    pub fn reconstruct(&self, detections: Vec<RawDetection>) -> ReconstructionResponse {
        self.guarded(|stage| {
            let detections = detections.into_iter().map(Ok).enumerate().collect();
            self.run(detections, stage)
        })
    }

    /// Reconstructs an already-identified recognizer payload.
    pub fn reconstruct_output(&self, output: RecognizerOutput) -> ReconstructionResponse {
        self.guarded(|stage| self.run(output.into_detections(), stage))
    }

    /// Reconstructs a parsed JSON recognizer payload.
    pub fn reconstruct_value(&self, value: Value) -> ReconstructionResponse {
        self.guarded(|stage| {
            let output = RecognizerOutput::from_value(value)?;
            self.run(output.into_detections(), stage)
        })
    }

    /// Reconstructs a recognizer payload from JSON text.
    pub fn reconstruct_json(&self, input: &str) -> ReconstructionResponse {
        self.guarded(|stage| {
            let output = RecognizerOutput::from_json(input)?;
            self.run(output.into_detections(), stage)
        })
    }

    /// Reconstructs independent payloads, preserving their order.
    ///
    /// Batches larger than the parallel policy's threshold are spread over
    /// rayon workers; a dedicated pool is built when `max_threads` is set.
    pub fn reconstruct_batch(&self, outputs: &[RecognizerOutput]) -> Vec<ReconstructionResponse> {
        let start = Instant::now();
        let policy = &self.config.parallel;

        let responses = if policy.should_use_parallel(outputs.len()) {
            debug!("Reconstructing {} payloads in parallel", outputs.len());
            let run = || {
                outputs
                    .par_iter()
                    .map(|output| self.reconstruct_output(output.clone()))
                    .collect::<Vec<_>>()
            };
            match policy.max_threads {
                Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                    Ok(pool) => pool.install(run),
                    Err(e) => {
                        warn!("Failed to build a {threads}-thread pool ({e}); using the global pool");
                        run()
                    }
                },
                None => run(),
            }
        } else {
            outputs
                .iter()
                .map(|output| self.reconstruct_output(output.clone()))
                .collect()
        };

        let failed = responses.iter().filter(|r| !r.success).count();
        let lines: usize = responses
            .iter()
            .filter_map(|r| r.stats.as_ref())
            .map(|stats| stats.lines)
            .sum();
        info!(
            "Reconstructed {} payloads ({} failed, {} lines) in {:?}",
            responses.len(),
            failed,
            lines,
            start.elapsed()
        );
        responses
    }

    /// Runs the stages and returns the full reconstruction.
    ///
    /// Unlike the `reconstruct*` methods this reports stage errors as `Err`.
    pub fn run_detections(
        &self,
        detections: Vec<IndexedDetection>,
    ) -> ReadingOrderResult<Reconstruction> {
        self.run(detections, &Cell::new(ProcessingStage::Decoding))
    }

    fn run(
        &self,
        detections: Vec<IndexedDetection>,
        stage: &Cell<ProcessingStage>,
    ) -> ReadingOrderResult<Reconstruction> {
        let start = Instant::now();

        stage.set(ProcessingStage::Normalization);
        let normalized = normalize_all(detections, self.config.clamp_confidence);
        let batch = normalized.data;

        stage.set(ProcessingStage::Clustering);
        let clustered = cluster_stage(&batch.fragments, self.config.y_threshold)?;

        stage.set(ProcessingStage::Ordering);
        let lines = order_lines(clustered.data);

        stage.set(ProcessingStage::Assembly);
        let document = assemble(lines, batch.fragments);

        let stats = ReconstructionStats::from_stages(
            &normalized.metrics,
            &clustered.metrics,
            start.elapsed(),
        );
        debug!(
            "Reconstruction: {} detections, {} skipped, {} lines ({:?} normalize, {:?} cluster, {:?} total)",
            stats.total_detections,
            stats.skipped,
            stats.lines,
            normalized.metrics.elapsed,
            clustered.metrics.elapsed,
            stats.processing_time
        );

        Ok(Reconstruction {
            document,
            skipped: batch.skipped,
            stats,
        })
    }

    fn guarded<F>(&self, f: F) -> ReconstructionResponse
    where
        F: FnOnce(&Cell<ProcessingStage>) -> ReadingOrderResult<Reconstruction>,
    {
        let stage = Cell::new(ProcessingStage::Decoding);
        match catch_unwind(AssertUnwindSafe(|| f(&stage))) {
            Ok(Ok(reconstruction)) => reconstruction.into_response(self.config.malformed_policy),
            Ok(Err(e)) => {
                error!("Reconstruction failed: {e}");
                ReconstructionResponse::failure(e.to_string())
            }
            Err(payload) => {
                let e = ReadingOrderError::internal(stage.get(), panic_message(payload.as_ref()));
                error!("Reconstruction panicked: {e}");
                ReconstructionResponse::failure(e.to_string())
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ParallelPolicy;
    use crate::pipeline::MalformedPolicy;
    use serde_json::json;

    fn hello_world() -> Vec<RawDetection> {
        vec![
            RawDetection::new("Hello", Some(0.9), json!([[0, 0], [40, 0], [40, 15], [0, 15]])),
            RawDetection::new("World", Some(0.8), json!([[50, 2], [90, 2], [90, 17], [50, 17]])),
            RawDetection::new("Second", Some(0.95), json!([[0, 30], [50, 30], [50, 45], [0, 45]])),
        ]
    }

    #[test]
    fn test_reconstruct_end_to_end() {
        let response = ReadingOrderPipeline::default().reconstruct(hello_world());
        assert!(response.success);
        assert_eq!(response.text(), "Hello World\nSecond");
        assert_eq!(response.data().len(), 3);
        assert_eq!(response.error, None);
    }

    #[test]
    fn test_empty_input_succeeds() {
        let response = ReadingOrderPipeline::default().reconstruct(Vec::new());
        assert!(response.success);
        assert_eq!(response.text(), "");
        assert!(response.data().is_empty());
    }

    #[test]
    fn test_invalid_json_fails_without_panicking() {
        let response = ReadingOrderPipeline::default().reconstruct_json("not json");
        assert!(!response.success);
        assert!(response.error.unwrap().contains("Invalid JSON input"));
    }

    #[test]
    fn test_unexpected_payload_is_empty_success() {
        let response = ReadingOrderPipeline::default().reconstruct_value(json!(7));
        assert!(response.success);
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_non_finite_geometry_reported_as_internal() {
        // Both corners are finite, but their sum overflows f32.
        let detections = vec![RawDetection::new("x", Some(0.5), json!([0, 3.0e38, 10, 3.0e38]))];
        let response = ReadingOrderPipeline::default().reconstruct(detections);
        assert!(!response.success);
        assert!(response.error.unwrap().contains("line clustering"));
    }

    #[test]
    fn test_panic_is_caught_with_stage() {
        let pipeline = ReadingOrderPipeline::default();
        let response = pipeline.guarded(|stage| {
            stage.set(ProcessingStage::Ordering);
            panic!("invariant broken");
        });
        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("internal error during line ordering: invariant broken")
        );
    }

    #[test]
    fn test_report_policy() {
        let config = ReadingOrderConfig::new().with_malformed_policy(MalformedPolicy::Report);
        let pipeline = ReadingOrderPipeline::new(config).unwrap();
        let mut detections = hello_world();
        detections.insert(1, RawDetection::new("bad", Some(0.5), json!([1, 2, 3])));

        let response = pipeline.reconstruct(detections);
        assert!(response.success);
        assert_eq!(response.data().len(), 3);
        assert_eq!(response.skipped, Some(1));
        assert_eq!(response.skipped_indices, Some(vec![1]));
    }

    #[test]
    fn test_run_detections_stats() {
        let mut detections: Vec<_> = hello_world().into_iter().map(Ok).enumerate().collect();
        detections.push((
            3,
            Err(ReadingOrderError::malformed_detection(3, "no box reported for this text")),
        ));

        let reconstruction = ReadingOrderPipeline::default()
            .run_detections(detections)
            .unwrap();
        assert_eq!(reconstruction.stats.total_detections, 4);
        assert_eq!(reconstruction.stats.normalized, 3);
        assert_eq!(reconstruction.stats.skipped, 1);
        assert_eq!(reconstruction.stats.lines, 2);
    }

    #[test]
    fn test_response_carries_stats() {
        let response = ReadingOrderPipeline::default().reconstruct(hello_world());
        let stats = response.stats.unwrap();
        assert_eq!(stats.total_detections, 3);
        assert_eq!(stats.normalized, 3);
        assert_eq!(stats.lines, 2);

        let failed = ReadingOrderPipeline::default().reconstruct_json("not json");
        assert!(failed.stats.is_none());
    }

    #[test]
    fn test_bad_leading_entries_keep_the_rest_of_the_page() {
        let config = ReadingOrderConfig::new().with_malformed_policy(MalformedPolicy::Report);
        let pipeline = ReadingOrderPipeline::new(config).unwrap();

        let leading_null = pipeline.reconstruct_value(json!([
            null,
            [[0, 0, 40, 15], ["Hello", 0.9]],
            [[50, 2, 90, 17], ["World", 0.8]]
        ]));
        assert_eq!(leading_null.text(), "Hello World");
        assert_eq!(leading_null.skipped, Some(0));

        let malformed_first = pipeline.reconstruct_value(json!([
            [[0, 0, 1, 1], [null, 0.5]],
            [[0, 0, 40, 15], ["Hello", 0.9]],
            [[50, 2, 90, 17], ["World", 0.8]]
        ]));
        assert_eq!(malformed_first.text(), "Hello World");
        assert_eq!(malformed_first.skipped_indices, Some(vec![0]));

        let in_page = pipeline.reconstruct_value(json!([[
            null,
            [[0, 0, 40, 15], ["Hello", 0.9]],
            [[1, 2, 3], ["bad", 0.9]]
        ]]));
        assert_eq!(in_page.text(), "Hello");
        assert_eq!(in_page.skipped_indices, Some(vec![2]));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ReadingOrderConfig::new();
        config.y_threshold = -2.0;
        assert!(ReadingOrderPipeline::new(config).is_err());
    }

    #[test]
    fn test_batch_preserves_order_in_parallel() {
        let config = ReadingOrderConfig::new()
            .with_parallel_policy(ParallelPolicy::new().with_batch_threshold(1))
            .with_max_threads(2);
        let pipeline = ReadingOrderPipeline::new(config).unwrap();

        let outputs: Vec<_> = (0..6)
            .map(|i| {
                RecognizerOutput::from_value(json!({
                    "rec_texts": [format!("page{i}")],
                    "rec_scores": [0.5],
                    "rec_boxes": [[0, 0, 10, 10]]
                }))
                .unwrap()
            })
            .collect();

        let responses = pipeline.reconstruct_batch(&outputs);
        let texts: Vec<_> = responses.iter().map(|r| r.text().to_string()).collect();
        assert_eq!(texts, vec!["page0", "page1", "page2", "page3", "page4", "page5"]);
    }

    #[test]
    fn test_batch_sequential_keeps_failures_local() {
        let outputs = vec![
            RecognizerOutput::Unrecognized,
            RecognizerOutput::PairList(vec![json!([[0, 0, 4, 4], ["ok", 0.9]])]),
        ];
        let responses = ReadingOrderPipeline::default().reconstruct_batch(&outputs);
        assert_eq!(responses.len(), 2);
        assert!(responses.iter().all(|r| r.success));
        assert_eq!(responses[1].text(), "ok");
    }
}
