//! Normalized fragments and the document they are assembled into.

use crate::core::constants::{FRAGMENT_SEPARATOR, LINE_SEPARATOR};
use crate::processors::BoundingQuad;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A normalized text fragment.
///
/// Fragments are immutable once produced by the normalizer. The `index` keeps
/// the fragment's position in recognition order so the structured output can
/// be reported in that order regardless of how lines were formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Position of the source detection in recognition order.
    #[serde(skip)]
    pub index: usize,
    /// The recognized text.
    pub text: Arc<str>,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f32,
    /// The canonical bounding quad.
    #[serde(rename = "box")]
    pub quad: BoundingQuad,
}

impl Fragment {
    /// Creates a new fragment.
    pub fn new(index: usize, text: impl Into<Arc<str>>, confidence: f32, quad: BoundingQuad) -> Self {
        Self {
            index,
            text: text.into(),
            confidence,
            quad,
        }
    }

    /// Vertical midpoint of the fragment's quad.
    #[inline]
    pub fn y_center(&self) -> f32 {
        self.quad.y_center()
    }

    /// Left edge of the fragment's quad.
    #[inline]
    pub fn x_min(&self) -> f32 {
        self.quad.x_min()
    }
}

/// Fragments sharing approximately the same vertical position.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// The `y_center` of the first fragment assigned to the line.
    pub reference_y: f32,
    /// Member fragments; left-to-right once the line has been ordered.
    pub fragments: Vec<Fragment>,
}

impl Line {
    /// Starts a line whose reference position is taken from `first`.
    pub fn start(first: Fragment) -> Self {
        Self {
            reference_y: first.y_center(),
            fragments: vec![first],
        }
    }

    /// Number of fragments in the line.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if the line holds no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The fragments' text joined by a single space.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_ref())
            .collect::<Vec<_>>()
            .join(FRAGMENT_SEPARATOR)
    }
}

/// The reconstructed document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Lines in top-to-bottom order, each ordered left-to-right.
    pub lines: Vec<Line>,
    /// Every fragment in recognition order.
    pub fragments: Vec<Fragment>,
    /// Lines joined by newline, fragments within a line by a space.
    pub full_text: String,
}

impl Document {
    /// Returns true if the document holds no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Text of each line, top to bottom.
    pub fn line_texts(&self) -> Vec<String> {
        self.lines.iter().map(Line::text).collect()
    }

    /// Fragments in reading order: lines top-to-bottom, left-to-right within each.
    pub fn reading_order(&self) -> impl Iterator<Item = &Fragment> {
        self.lines.iter().flat_map(|line| line.fragments.iter())
    }

    /// Joins line texts the way the assembled `full_text` is built.
    pub(crate) fn join_lines<I>(lines: I) -> String
    where
        I: IntoIterator<Item = String>,
    {
        lines.into_iter().collect::<Vec<_>>().join(LINE_SEPARATOR)
    }
}
