//! Raw detections as produced by a recognizer, before normalization.

use crate::core::ReadingOrderResult;
use crate::processors::{BoundingQuad, Point};
use serde_json::Value;
use std::sync::Arc;

/// One recognized text fragment whose box shape has not been inspected yet.
///
/// The box is kept as the JSON value the recognizer emitted. It is decoded
/// exactly once, by [`BoxShape::parse`], during normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// The recognized text.
    pub text: Arc<str>,
    /// The recognition confidence, if the recognizer reported one.
    pub confidence: Option<f32>,
    /// The box in whatever shape the recognizer produced.
    pub raw_box: Value,
}

impl RawDetection {
    /// Creates a detection from its parts.
    pub fn new(text: impl Into<Arc<str>>, confidence: Option<f32>, raw_box: Value) -> Self {
        Self {
            text: text.into(),
            confidence,
            raw_box,
        }
    }
}

/// A decoded detection, or the reason it could not be decoded, tagged with
/// its position in the recognizer payload.
pub type IndexedDetection = (usize, ReadingOrderResult<RawDetection>);

/// The three box layouts recognizers are known to emit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxShape {
    /// Four `[x, y]` points, clockwise from the top-left.
    Quad([[f32; 2]; 4]),
    /// `x1, y1, x2, y2, x3, y3, x4, y4` in the same clockwise order.
    FlatEight([f32; 8]),
    /// `x1, y1, x2, y2`: the top-left and bottom-right corners.
    FlatFour([f32; 4]),
}

impl BoxShape {
    /// Identifies the layout of a raw box.
    ///
    /// Returns a human-readable reason when the value matches none of the
    /// known layouts.
    pub fn parse(value: &Value) -> Result<Self, String> {
        let items = match value {
            Value::Array(items) if !items.is_empty() => items,
            Value::Array(_) => return Err("box is empty".to_string()),
            Value::Null => return Err("box is missing".to_string()),
            other => return Err(format!("box is not a sequence: {other}")),
        };

        if items.iter().all(Value::is_array) {
            return Self::parse_points(items);
        }

        let coords = items
            .iter()
            .map(as_coordinate)
            .collect::<Option<Vec<f32>>>()
            .ok_or_else(|| format!("box contains non-numeric values: {value}"))?;

        match coords.len() {
            8 => {
                let mut flat = [0.0; 8];
                flat.copy_from_slice(&coords);
                Ok(Self::FlatEight(flat))
            }
            4 => Ok(Self::FlatFour([coords[0], coords[1], coords[2], coords[3]])),
            n => Err(format!("box has {n} coordinates, expected 4 or 8")),
        }
    }

    fn parse_points(items: &[Value]) -> Result<Self, String> {
        if items.len() != 4 {
            return Err(format!("box has {} points, expected 4", items.len()));
        }

        let mut points = [[0.0; 2]; 4];
        for (slot, item) in points.iter_mut().zip(items) {
            let pair = item.as_array().map(Vec::as_slice).unwrap_or_default();
            match pair {
                [x, y] => {
                    let (Some(x), Some(y)) = (as_coordinate(x), as_coordinate(y)) else {
                        return Err(format!("point {item} has non-numeric coordinates"));
                    };
                    *slot = [x, y];
                }
                _ => return Err(format!("point {item} does not have exactly 2 coordinates")),
            }
        }
        Ok(Self::Quad(points))
    }

    /// Converts the layout into the canonical clockwise quad.
    pub fn into_quad(self) -> BoundingQuad {
        match self {
            Self::Quad([tl, tr, br, bl]) => {
                BoundingQuad::new(tl.into(), tr.into(), br.into(), bl.into())
            }
            Self::FlatEight([x1, y1, x2, y2, x3, y3, x4, y4]) => BoundingQuad::new(
                Point::new(x1, y1),
                Point::new(x2, y2),
                Point::new(x3, y3),
                Point::new(x4, y4),
            ),
            Self::FlatFour([x1, y1, x2, y2]) => BoundingQuad::from_coords(x1, y1, x2, y2),
        }
    }
}

fn as_coordinate(value: &Value) -> Option<f32> {
    value
        .as_f64()
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
}
