//! Result types for reading-order reconstruction.

use super::config::MalformedPolicy;
use super::stages::{SkippedDetection, StageMetrics};
use crate::domain::{Document, Fragment};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counters describing one reconstruction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconstructionStats {
    /// Detections decoded from the payload, including malformed ones.
    pub total_detections: usize,
    /// Detections that became fragments.
    pub normalized: usize,
    /// Detections that were skipped.
    pub skipped: usize,
    /// Lines formed.
    pub lines: usize,
    /// Wall time spent in the pipeline stages.
    pub processing_time: Duration,
}

impl ReconstructionStats {
    /// Builds the counters from the normalization and clustering metrics.
    pub fn from_stages(
        normalization: &StageMetrics,
        clustering: &StageMetrics,
        processing_time: Duration,
    ) -> Self {
        Self {
            total_detections: normalization.consumed,
            normalized: normalization.produced,
            skipped: normalization.rejected,
            lines: clustering.produced,
            processing_time,
        }
    }
}

/// A successful reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    /// The assembled document.
    pub document: Document,
    /// Detections left out because they could not be normalized.
    pub skipped: Vec<SkippedDetection>,
    /// Counters for monitoring.
    pub stats: ReconstructionStats,
}

impl Reconstruction {
    /// Converts into the wire response, reporting skips when `policy` asks for it.
    pub fn into_response(self, policy: MalformedPolicy) -> ReconstructionResponse {
        let mut response =
            ReconstructionResponse::success(self.document.full_text, self.document.fragments);
        response.stats = Some(self.stats);
        if policy == MalformedPolicy::Report {
            response.skipped = Some(self.skipped.len());
            response.skipped_indices = Some(self.skipped.iter().map(|s| s.index).collect());
        }
        response
    }
}

/// The structured result handed to callers.
///
/// Serializes as `{"success": true, "text": .., "data": [..]}` on success and
/// `{"success": false, "error": ..}` on failure. Skip counts appear only when
/// the malformed-detection policy is `report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionResponse {
    /// Whether reconstruction succeeded.
    pub success: bool,
    /// The assembled text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Per-fragment records in recognition order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Fragment>>,
    /// Number of malformed detections left out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<usize>,
    /// Recognition-order indices of the malformed detections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_indices: Option<Vec<usize>>,
    /// Human-readable diagnostic on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Counters of a successful reconstruction. Not part of the wire format.
    #[serde(skip)]
    pub stats: Option<ReconstructionStats>,
}

impl ReconstructionResponse {
    /// A successful response.
    pub fn success(text: String, data: Vec<Fragment>) -> Self {
        Self {
            success: true,
            text: Some(text),
            data: Some(data),
            skipped: None,
            skipped_indices: None,
            error: None,
            stats: None,
        }
    }

    /// A failed response carrying `error` as its diagnostic.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            data: None,
            skipped: None,
            skipped_indices: None,
            error: Some(error.into()),
            stats: None,
        }
    }

    /// The assembled text, or an empty string on failure.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// The per-fragment records, or an empty slice on failure.
    pub fn data(&self) -> &[Fragment] {
        self.data.as_deref().unwrap_or_default()
    }

    /// Serializes the response to JSON.
    pub fn to_json(&self, pretty: bool) -> String {
        let encoded = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        // Every field is a plain string, number, bool or finite-valued array.
        encoded.unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"error":{}}}"#,
                serde_json::Value::String(format!("failed to encode response: {e}"))
            )
        })
    }
}
