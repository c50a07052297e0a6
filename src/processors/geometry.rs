//! Geometric primitives for reading-order reconstruction.
//!
//! This module provides the point and quadrilateral types that every stage
//! after normalization works with, together with the two scalar keys the
//! reconstruction is driven by: the vertical center used for line grouping and
//! the left edge used for ordering within a line.

use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates in image pixels.
///
/// Serialized as a two-element array `[x, y]`, the layout recognizers emit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// A four-cornered polygon bounding a text fragment.
///
/// Corners are stored clockwise starting at the top-left:
/// top-left, top-right, bottom-right, bottom-left. Degenerate (zero-area)
/// quads are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundingQuad {
    points: [Point; 4],
}

impl BoundingQuad {
    /// Creates a quad from its corners in clockwise order starting at the top-left.
    pub fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Self {
        Self {
            points: [top_left, top_right, bottom_right, bottom_left],
        }
    }

    /// Creates an axis-aligned quad from its top-left and bottom-right corners.
    ///
    /// # Arguments
    ///
    /// * `x1` - The x-coordinate of the top-left corner.
    /// * `y1` - The y-coordinate of the top-left corner.
    /// * `x2` - The x-coordinate of the bottom-right corner.
    /// * `y2` - The y-coordinate of the bottom-right corner.
    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        )
    }

    /// The four corners in clockwise order.
    pub fn points(&self) -> &[Point; 4] {
        &self.points
    }

    pub fn top_left(&self) -> Point {
        self.points[0]
    }

    pub fn top_right(&self) -> Point {
        self.points[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.points[2]
    }

    pub fn bottom_left(&self) -> Point {
        self.points[3]
    }

    /// Vertical midpoint of the quad, the line-grouping key.
    ///
    /// Computed from the top-left and bottom-right corners only.
    pub fn y_center(&self) -> f32 {
        (self.top_left().y + self.bottom_right().y) / 2.0
    }

    /// Left edge of the quad, the within-line ordering key.
    ///
    /// This is the top-left corner's x-coordinate, not the minimum over all
    /// corners.
    pub fn x_min(&self) -> f32 {
        self.top_left().x
    }

    /// Returns true if every corner has finite coordinates.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Point::is_finite)
    }
}
