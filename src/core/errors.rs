//! Error types for reading-order reconstruction.
//!
//! This module defines the errors that can occur while decoding recognizer
//! output, normalizing detections, grouping them into lines and assembling the
//! final text. None of these errors cross the public reconstruction boundary:
//! [`crate::pipeline::ReadingOrderPipeline`] maps them into a failed
//! [`crate::pipeline::ReconstructionResponse`].

use thiserror::Error;

/// Enum representing the stages of the reconstruction pipeline.
///
/// This enum is used to identify which stage an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Splitting a recognizer payload into individual detections.
    Decoding,
    /// Converting a detection's box into the canonical quad.
    Normalization,
    /// Grouping fragments into lines by vertical proximity.
    Clustering,
    /// Sorting fragments within a line.
    Ordering,
    /// Joining fragments and lines into the final text.
    Assembly,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Decoding => write!(f, "decoding"),
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::Clustering => write!(f, "line clustering"),
            ProcessingStage::Ordering => write!(f, "line ordering"),
            ProcessingStage::Assembly => write!(f, "text assembly"),
        }
    }
}

/// Enum representing the errors that can occur during reconstruction.
#[derive(Error, Debug)]
pub enum ReadingOrderError {
    /// A single detection could not be normalized.
    ///
    /// Callers skip the detection and continue with the rest of the batch.
    #[error("malformed detection at index {index}: {reason}")]
    MalformedDetection {
        /// Position of the detection in recognition order.
        index: usize,
        /// Why the detection was rejected.
        reason: String,
    },

    /// The recognizer payload could not be interpreted.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// An internal invariant was violated.
    #[error("internal error during {stage}: {context}")]
    Internal {
        /// The stage where the invariant broke.
        stage: ProcessingStage,
        /// Additional context about the error.
        context: String,
    },

    /// JSON (de)serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl ReadingOrderError {
    /// Creates a `MalformedDetection` error for the detection at `index`.
    pub fn malformed_detection(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedDetection {
            index,
            reason: reason.into(),
        }
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for configuration problems.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates an internal error for an invariant violation in `stage`.
    pub fn internal(stage: ProcessingStage, context: impl Into<String>) -> Self {
        Self::Internal {
            stage,
            context: context.into(),
        }
    }
}

impl From<crate::core::config::ConfigError> for ReadingOrderError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

/// Convenient result alias for reconstruction operations.
pub type ReadingOrderResult<T> = Result<T, ReadingOrderError>;
