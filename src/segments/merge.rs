//! Segment merging - per-segment labels to contiguous speaker turns

use super::{Interval, Segment};

/// Merge labelled segments into speaker turns in a single left-to-right pass.
///
/// - A gap between the open turn and the next segment always starts a new
///   turn, even when the label is unchanged.
/// - Touching or overlapping segments with the same label extend the turn.
/// - Touching or overlapping segments with a different label split at the
///   midpoint of the open turn's end and the new segment's start.
///
/// Labels and segments are paired by position; extra items on either side
/// are ignored.
pub fn merge_segments(labels: &[usize], segments: &[Segment]) -> Vec<Interval> {
    let mut turns: Vec<Interval> = Vec::new();

    for (&label, segment) in labels.iter().zip(segments) {
        let Some(open) = turns.last_mut() else {
            turns.push(Interval {
                start: segment.start,
                end: segment.end,
                label,
            });
            continue;
        };

        if open.end < segment.start {
            turns.push(Interval {
                start: segment.start,
                end: segment.end,
                label,
            });
        } else if open.label == label {
            open.end = segment.end;
        } else {
            let boundary = (open.end + segment.start) / 2.0;
            open.end = boundary;
            turns.push(Interval {
                start: boundary,
                end: segment.end,
                label,
            });
        }
    }

    turns
}
