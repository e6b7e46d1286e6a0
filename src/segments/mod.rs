//! Segment timing: the upstream segment table and label-to-turn merging

pub mod merge;
pub mod table;

use serde::{Deserialize, Serialize};

pub use merge::merge_segments;
pub use table::{SegmentRow, SegmentTable};

/// One scored segment of a recording, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// A contiguous speaker turn after merging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
    pub label: usize,
}

impl Interval {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
