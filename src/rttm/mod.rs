// RTTM output
//
// - writer.rs: SPEAKER line formatting, per-path writer
// - aggregate.rs: merge RTTM files grouped by recording

pub mod aggregate;
pub mod writer;

pub use aggregate::{sort_and_cat, RECORDING_COLUMN};
pub use writer::{lines_to_file, rttm_line, rttm_lines, RttmWriter};
