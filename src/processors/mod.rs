//! Geometric primitives for detected text.
//!
//! * `geometry` - points and the canonical bounding quad

mod geometry;

pub use geometry::*;
