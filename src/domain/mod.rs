//! Domain-level structures shared across the reconstruction pipeline.
//!
//! This module groups the detection, fragment and document types, as well as
//! the adapters that turn recognizer payloads into detections.

pub mod adapters;
pub mod detection;
pub mod document;

pub use adapters::RecognizerOutput;
pub use detection::{BoxShape, IndexedDetection, RawDetection};
pub use document::{Document, Fragment, Line};
