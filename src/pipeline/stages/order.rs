//! Left-to-right ordering within a line.

use crate::domain::Line;

/// Sorts a line's fragments by `x_min`.
///
/// The sort is stable: fragments with the same `x_min` keep the order they
/// had after clustering.
pub fn order_line(line: &mut Line) {
    line.fragments
        .sort_by(|a, b| a.x_min().total_cmp(&b.x_min()));
}

/// Orders every line in place and hands the lines back.
pub fn order_lines(mut lines: Vec<Line>) -> Vec<Line> {
    lines.iter_mut().for_each(order_line);
    lines
}
