//! Segment table loader
//!
//! Whitespace-delimited text, one segment per line:
//! `<segment-id> <recording-id> <start> <end> [...]`

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::Segment;
use crate::error::{ClusterError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRow {
    pub segment_id: String,
    pub recording_id: String,
    pub segment: Segment,
}

/// All rows of a segment table, in file order
#[derive(Debug, Clone, Default)]
pub struct SegmentTable {
    rows: Vec<SegmentRow>,
}

impl SegmentTable {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let table = Self::parse(&text, path)?;
        debug!("Loaded {} segments from {}", table.len(), path.display());
        Ok(table)
    }

    /// Parse table text; `source` is only used in error messages
    pub fn parse(text: &str, source: &Path) -> Result<Self> {
        let mut rows = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }

            let malformed = |reason: String| ClusterError::MalformedSegmentLine {
                path: PathBuf::from(source),
                line: idx + 1,
                reason,
            };

            if fields.len() < 4 {
                return Err(malformed(format!(
                    "expected at least 4 columns, found {}",
                    fields.len()
                )));
            }
            let parse_time = |field: &str| {
                field
                    .parse::<f64>()
                    .map_err(|e| malformed(format!("invalid time '{}': {}", field, e)))
            };
            let start = parse_time(fields[2])?;
            let end = parse_time(fields[3])?;

            rows.push(SegmentRow {
                segment_id: fields[0].to_string(),
                recording_id: fields[1].to_string(),
                segment: Segment::new(start, end),
            });
        }

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[SegmentRow] {
        &self.rows
    }

    /// Distinct recording ids, sorted
    pub fn recording_ids(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|r| r.recording_id.as_str()).collect()
    }

    /// Segments of one recording, in table order
    pub fn segments_for(&self, recording_id: &str) -> Vec<Segment> {
        self.rows
            .iter()
            .filter(|r| r.recording_id == recording_id)
            .map(|r| r.segment)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    const TABLE: &str = "\
rec2_000 rec2 0.00 1.50
rec1_000 rec1 0.00 1.50
rec1_001 rec1 0.75 2.25

rec2_001 rec2 0.75 2.25 extra
";

    #[test]
    fn test_parse_rows() {
        let table = SegmentTable::parse(TABLE, Path::new("segments")).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.recording_ids().into_iter().collect::<Vec<_>>(), vec!["rec1", "rec2"]);
        assert_eq!(
            table.segments_for("rec1"),
            vec![Segment::new(0.0, 1.5), Segment::new(0.75, 2.25)]
        );
        assert_eq!(table.rows()[3].segment_id, "rec2_001");
        assert!(table.segments_for("rec3").is_empty());
    }

    #[test]
    fn test_too_few_columns() {
        let err = SegmentTable::parse("a rec1 0.0\n", Path::new("segments")).unwrap_err();
        match err {
            ClusterError::MalformedSegmentLine { line, reason, .. } => {
                assert_eq!(line, 1);
                assert!(reason.contains("4 columns"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_bad_time() {
        let err = SegmentTable::parse("a rec1 0.0 1.0\nb rec1 x 2.0\n", Path::new("segments"))
            .unwrap_err();
        assert!(matches!(err, ClusterError::MalformedSegmentLine { line: 2, .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("segments");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();

        let table = SegmentTable::load(&path).unwrap();
        assert_eq!(table.len(), 4);
    }
}
