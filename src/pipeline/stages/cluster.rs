//! Line clustering by vertical proximity.
//!
//! A single greedy scan over fragments sorted by `y_center`. Each line keeps
//! the `y_center` of the fragment that opened it as its reference; the
//! reference is never recomputed as more fragments join. On skewed input
//! this lets a line accumulate fragments that have drifted away from each
//! other, and that is the expected output.

use super::types::{StageMetrics, StageResult};
use crate::core::{ProcessingStage, ReadingOrderError, ReadingOrderResult};
use crate::domain::{Fragment, Line};
use std::time::Instant;
use tracing::debug;

/// Groups fragments into lines, top to bottom.
///
/// Fragments are stably sorted by `y_center`, so fragments at the same
/// height keep their recognition order. A fragment joins the open line when
/// its `y_center` is strictly closer than `y_threshold` to the line's
/// reference; otherwise it closes that line and opens the next one.
///
/// Members of each returned line are in scan order, not yet left-to-right.
///
/// # Errors
///
/// Returns an internal error if a fragment's `y_center` is not finite.
pub fn cluster_lines(fragments: &[Fragment], y_threshold: f32) -> ReadingOrderResult<Vec<Line>> {
    if let Some(bad) = fragments.iter().find(|f| !f.y_center().is_finite()) {
        return Err(ReadingOrderError::internal(
            ProcessingStage::Clustering,
            format!(
                "fragment {} has non-finite y_center {}",
                bad.index,
                bad.y_center()
            ),
        ));
    }

    let mut sorted: Vec<&Fragment> = fragments.iter().collect();
    sorted.sort_by(|a, b| a.y_center().total_cmp(&b.y_center()));

    // The last line is the one still open.
    let mut lines: Vec<Line> = Vec::new();
    for fragment in sorted {
        match lines.last_mut() {
            Some(line) if (fragment.y_center() - line.reference_y).abs() < y_threshold => {
                line.fragments.push(fragment.clone());
            }
            _ => lines.push(Line::start(fragment.clone())),
        }
    }

    Ok(lines)
}

/// Runs [`cluster_lines`] and records stage metrics.
pub fn cluster_stage(
    fragments: &[Fragment],
    y_threshold: f32,
) -> ReadingOrderResult<StageResult<Vec<Line>>> {
    let started = Instant::now();
    let lines = cluster_lines(fragments, y_threshold)?;

    let metrics = StageMetrics::finish(
        ProcessingStage::Clustering,
        started,
        fragments.len(),
        lines.len(),
        0,
    );
    debug!(
        "Grouped {} fragments into {} lines (threshold {y_threshold}px)",
        metrics.consumed, metrics.produced
    );

    Ok(StageResult::new(lines, metrics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::BoundingQuad;

    /// Fragment whose quad is centred vertically on `y_center`.
    fn at(index: usize, text: &str, x: f32, y_center: f32) -> Fragment {
        Fragment::new(
            index,
            text,
            1.0,
            BoundingQuad::from_coords(x, y_center - 5.0, x + 20.0, y_center + 5.0),
        )
    }

    fn texts(lines: &[Line]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|l| l.fragments.iter().map(|f| f.text.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_empty_input_yields_no_lines() {
        assert!(cluster_lines(&[], 10.0).unwrap().is_empty());
    }

    #[test]
    fn test_single_fragment_single_line() {
        let lines = cluster_lines(&[at(0, "solo", 0.0, 50.0)], 10.0).unwrap();
        assert_eq!(texts(&lines), vec![vec!["solo"]]);
        assert_eq!(lines[0].reference_y, 50.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let joined = cluster_lines(&[at(0, "a", 0.0, 100.0), at(1, "b", 0.0, 109.0)], 10.0).unwrap();
        assert_eq!(joined.len(), 1);

        let edge = cluster_lines(&[at(0, "a", 0.0, 100.0), at(1, "b", 0.0, 110.0)], 10.0).unwrap();
        assert_eq!(edge.len(), 2);

        let split = cluster_lines(&[at(0, "a", 0.0, 100.0), at(1, "b", 0.0, 111.0)], 10.0).unwrap();
        assert_eq!(texts(&split), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_lines_sorted_top_to_bottom() {
        let fragments = [
            at(0, "bottom", 0.0, 300.0),
            at(1, "top", 0.0, 10.0),
            at(2, "middle", 0.0, 150.0),
        ];
        let lines = cluster_lines(&fragments, 10.0).unwrap();
        assert_eq!(texts(&lines), vec![vec!["top"], vec!["middle"], vec!["bottom"]]);
    }

    #[test]
    fn test_reference_does_not_follow_drift() {
        // Intentional: each fragment is within 10px of its predecessor, but
        // the line's reference stays at the first fragment's y_center (100).
        let fragments = [
            at(0, "a", 0.0, 100.0),
            at(1, "b", 30.0, 106.0),
            at(2, "c", 60.0, 112.0),
            at(3, "d", 90.0, 118.0),
        ];
        let lines = cluster_lines(&fragments, 10.0).unwrap();
        assert_eq!(texts(&lines), vec![vec!["a", "b"], vec!["c", "d"]]);
        assert_eq!(lines[1].reference_y, 112.0);
    }

    #[test]
    fn test_ties_keep_recognition_order() {
        let fragments = [at(0, "first", 50.0, 20.0), at(1, "second", 10.0, 20.0)];
        let lines = cluster_lines(&fragments, 10.0).unwrap();
        assert_eq!(texts(&lines), vec![vec!["first", "second"]]);
    }

    #[test]
    fn test_stage_metrics_count_lines() {
        let fragments = [at(0, "a", 0.0, 10.0), at(1, "b", 30.0, 12.0), at(2, "c", 0.0, 40.0)];
        let result = cluster_stage(&fragments, 10.0).unwrap();
        assert_eq!(result.metrics.stage, ProcessingStage::Clustering);
        assert_eq!(result.metrics.consumed, 3);
        assert_eq!(result.metrics.produced, 2);
        assert_eq!(result.metrics.produced, result.data.len());
    }

    #[test]
    fn test_non_finite_center_is_internal_error() {
        let bad = Fragment::new(
            4,
            "nan",
            1.0,
            BoundingQuad::from_coords(0.0, f32::NAN, 1.0, 1.0),
        );
        let err = cluster_lines(&[bad], 10.0).unwrap_err();
        assert!(matches!(
            err,
            ReadingOrderError::Internal {
                stage: ProcessingStage::Clustering,
                ..
            }
        ));
    }
}
