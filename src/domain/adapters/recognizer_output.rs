//! Decoders for the payload shapes text recognizers emit.
//!
//! Two historical layouts are in circulation:
//!
//! - an aggregate object with parallel arrays `rec_texts`, `rec_scores` and
//!   `rec_boxes` (optionally wrapped in a one-element list), and
//! - a legacy page list `[[ [box, [text, confidence]], ... ]]`, or the bare
//!   list of `[box, [text, confidence]]` pairs inside it.
//!
//! Both decode into the same sequence of [`RawDetection`]s. Nothing past this
//! module knows which layout a detection came from.

use crate::core::{ReadingOrderError, ReadingOrderResult};
use crate::domain::{IndexedDetection, RawDetection};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Aggregate recognizer output with parallel arrays indexed by position.
///
/// The arrays may have different lengths; see
/// [`RecognizerOutput::into_detections`] for how gaps are handled.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AggregateOutput {
    /// Recognized texts.
    #[serde(default)]
    pub rec_texts: Vec<String>,
    /// Recognition scores, in the same order as `rec_texts`.
    #[serde(default)]
    pub rec_scores: Vec<Value>,
    /// Boxes, in the same order as `rec_texts`.
    #[serde(default)]
    pub rec_boxes: Vec<Value>,
}

/// A recognizer payload in one of the accepted layouts.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognizerOutput {
    /// Parallel arrays.
    Aggregate(AggregateOutput),
    /// Entries of the form `[box, [text, confidence]]`; nulls are ignored.
    PairList(Vec<Value>),
    /// A payload matching no known layout. Decodes to no detections.
    Unrecognized,
}

impl RecognizerOutput {
    /// Parses a recognizer payload from JSON text.
    pub fn from_json(input: &str) -> ReadingOrderResult<Self> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| ReadingOrderError::invalid_input(format!("Invalid JSON input: {e}")))?;
        Self::from_value(value)
    }

    /// Identifies the layout of an already-parsed payload.
    ///
    /// A list holding at least one `[box, [text, confidence]]` entry is a bare
    /// pair list, whatever its other entries look like. Otherwise the first
    /// non-blank element decides: an aggregate object, or the first page of a
    /// legacy page list. Unknown layouts yield
    /// [`RecognizerOutput::Unrecognized`] with a warning.
    ///
    /// Fails only when a payload announces the aggregate layout but its
    /// arrays cannot be read.
    pub fn from_value(value: Value) -> ReadingOrderResult<Self> {
        if value.get("rec_texts").is_some() {
            return Self::aggregate_from(value);
        }

        match value {
            Value::Array(items) if items.iter().any(is_pair) => Ok(Self::PairList(items)),
            Value::Array(items) => match items.into_iter().find(|item| !is_blank(item)) {
                Some(Value::Array(page)) => Ok(Self::PairList(page)),
                Some(first @ Value::Object(_)) if first.get("rec_texts").is_some() => {
                    Self::aggregate_from(first)
                }
                Some(first) => {
                    warn!("Unexpected recognizer result[0] format: {first}");
                    Ok(Self::Unrecognized)
                }
                None => {
                    warn!("Recognizer result holds no entries");
                    Ok(Self::Unrecognized)
                }
            },
            other => {
                warn!("Unexpected recognizer result format: {other}");
                Ok(Self::Unrecognized)
            }
        }
    }

    fn aggregate_from(value: Value) -> ReadingOrderResult<Self> {
        AggregateOutput::deserialize(value)
            .map(Self::Aggregate)
            .map_err(|e| {
                ReadingOrderError::invalid_input(format!("malformed aggregate recognizer output: {e}"))
            })
    }

    /// Splits the payload into detections in recognition order.
    ///
    /// Each element is either a detection or the `MalformedDetection` error
    /// for that position; a bad entry never affects its neighbours. Blank
    /// pair-list entries are dropped but still count as positions.
    pub fn into_detections(self) -> Vec<IndexedDetection> {
        let detections: Vec<_> = match self {
            Self::Aggregate(output) => aggregate_detections(output),
            Self::PairList(entries) => entries
                .into_iter()
                .enumerate()
                .filter(|(_, entry)| !is_blank(entry))
                .map(|(index, entry)| (index, pair_detection(index, entry)))
                .collect(),
            Self::Unrecognized => Vec::new(),
        };
        debug!("Decoded {} detections from recognizer output", detections.len());
        detections
    }
}

impl TryFrom<Value> for RecognizerOutput {
    type Error = ReadingOrderError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn aggregate_detections(output: AggregateOutput) -> Vec<IndexedDetection> {
    let AggregateOutput {
        rec_texts,
        rec_scores,
        mut rec_boxes,
    } = output;

    if rec_scores.len() < rec_texts.len() {
        debug!(
            "rec_scores has {} entries for {} texts; missing scores default to 0.0",
            rec_scores.len(),
            rec_texts.len()
        );
    }
    rec_boxes.truncate(rec_texts.len());
    let mut boxes = rec_boxes.into_iter();

    rec_texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let confidence = rec_scores
                .get(index)
                .and_then(|score| coerce_confidence(index, score));
            let detection = boxes
                .next()
                .map(|raw_box| RawDetection::new(text, confidence, raw_box))
                .ok_or_else(|| {
                    ReadingOrderError::malformed_detection(index, "no box reported for this text")
                });
            (index, detection)
        })
        .collect()
}

fn pair_detection(index: usize, entry: Value) -> ReadingOrderResult<RawDetection> {
    let Value::Array(parts) = entry else {
        return Err(ReadingOrderError::malformed_detection(
            index,
            format!("entry is not a [box, [text, confidence]] pair: {entry}"),
        ));
    };
    // Anything after the recognition part is ignored.
    let mut parts = parts.into_iter();
    let (Some(raw_box), Some(info)) = (parts.next(), parts.next()) else {
        return Err(ReadingOrderError::malformed_detection(
            index,
            "entry is missing its box or recognition part",
        ));
    };

    let info = info.as_array().map(Vec::as_slice).unwrap_or_default();
    let text: Arc<str> = match info.first() {
        Some(Value::String(text)) => text.as_str().into(),
        _ => {
            return Err(ReadingOrderError::malformed_detection(
                index,
                "recognition part has no text",
            ));
        }
    };
    let confidence = info
        .get(1)
        .and_then(|score| coerce_confidence(index, score));

    Ok(RawDetection::new(text, confidence, raw_box))
}

/// Reads a confidence that may be a number or a numeric string.
fn coerce_confidence(index: usize, value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => s.trim().parse::<f32>().ok().or_else(|| {
            warn!("Detection {index}: confidence {s:?} is not numeric; using 0.0");
            None
        }),
        Value::Null => None,
        other => {
            warn!("Detection {index}: confidence {other} is not numeric; using 0.0");
            None
        }
    }
}

/// A bare pair looks like `[box, [text, ...], ...]`.
fn is_pair(value: &Value) -> bool {
    match value.as_array().map(Vec::as_slice) {
        Some([_, Value::Array(info), ..]) => matches!(info.first(), Some(Value::String(_))),
        _ => false,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
