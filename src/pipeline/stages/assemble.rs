//! Text assembly.
//!
//! Joins ordered lines into the final text. The structured fragment list is
//! passed through in recognition order, not reading order; callers that want
//! reading order walk [`Document::lines`] instead.

use crate::domain::{Document, Fragment, Line};

/// Builds the document from ordered lines and the recognition-ordered fragments.
pub fn assemble(lines: Vec<Line>, fragments: Vec<Fragment>) -> Document {
    let full_text = Document::join_lines(lines.iter().map(Line::text));
    Document {
        lines,
        fragments,
        full_text,
    }
}
