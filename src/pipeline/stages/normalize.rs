//! Fragment normalization.
//!
//! Turns each raw detection into a [`Fragment`] with a canonical
//! [`BoundingQuad`](crate::processors::BoundingQuad). Detections whose box
//! cannot be read are set aside with their reason; they never fail the batch.

use super::types::{StageMetrics, StageResult};
use crate::core::constants::MISSING_CONFIDENCE;
use crate::core::{ProcessingStage, ReadingOrderError, ReadingOrderResult};
use crate::domain::{BoxShape, Fragment, IndexedDetection, RawDetection};
use std::time::Instant;
use tracing::{debug, warn};

/// A detection that was left out of the reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDetection {
    /// Position of the detection in recognition order.
    pub index: usize,
    /// Why it was skipped.
    pub reason: String,
}

/// Output of the normalization stage.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Normalized fragments in recognition order.
    pub fragments: Vec<Fragment>,
    /// Detections that could not be normalized.
    pub skipped: Vec<SkippedDetection>,
}

/// Normalizes one detection.
///
/// # Arguments
///
/// * `index` - Position of the detection in recognition order
/// * `detection` - The detection to normalize
/// * `clamp_confidence` - Whether to coerce the confidence into `[0, 1]`
pub fn normalize_detection(
    index: usize,
    detection: RawDetection,
    clamp_confidence: bool,
) -> ReadingOrderResult<Fragment> {
    let shape = BoxShape::parse(&detection.raw_box)
        .map_err(|reason| ReadingOrderError::malformed_detection(index, reason))?;
    let confidence = coerce_confidence(index, detection.confidence, clamp_confidence);

    Ok(Fragment::new(
        index,
        detection.text,
        confidence,
        shape.into_quad(),
    ))
}

fn coerce_confidence(index: usize, confidence: Option<f32>, clamp: bool) -> f32 {
    match confidence {
        None => MISSING_CONFIDENCE,
        Some(c) if c.is_nan() => {
            warn!("Detection {index}: confidence is NaN; using {MISSING_CONFIDENCE}");
            MISSING_CONFIDENCE
        }
        Some(c) if clamp && !(0.0..=1.0).contains(&c) => {
            warn!("Detection {index}: confidence {c} out of range, clamping to [0.0, 1.0]");
            c.clamp(0.0, 1.0)
        }
        Some(c) => c,
    }
}

/// Runs normalization over a decoded detection sequence.
///
/// Elements that are already errors (for example a text without a box) are
/// recorded as skipped alongside detections whose box fails to parse. Each
/// fragment and skip keeps the position its detection had in the payload.
pub fn normalize_all(
    detections: Vec<IndexedDetection>,
    clamp_confidence: bool,
) -> StageResult<NormalizedBatch> {
    let started = Instant::now();
    let consumed = detections.len();
    let mut batch = NormalizedBatch {
        fragments: Vec::with_capacity(consumed),
        skipped: Vec::new(),
    };

    for (index, detection) in detections {
        let outcome =
            detection.and_then(|detection| normalize_detection(index, detection, clamp_confidence));
        match outcome {
            Ok(fragment) => batch.fragments.push(fragment),
            Err(ReadingOrderError::MalformedDetection { index, reason }) => {
                warn!("Skipping malformed detection {index}: {reason}");
                batch.skipped.push(SkippedDetection { index, reason });
            }
            Err(other) => {
                warn!("Skipping detection {index}: {other}");
                batch.skipped.push(SkippedDetection {
                    index,
                    reason: other.to_string(),
                });
            }
        }
    }

    let metrics = StageMetrics::finish(
        ProcessingStage::Normalization,
        started,
        consumed,
        batch.fragments.len(),
        batch.skipped.len(),
    );
    debug!(
        "Normalized {} detections ({} skipped)",
        metrics.produced, metrics.rejected
    );

    StageResult::new(batch, metrics)
}
