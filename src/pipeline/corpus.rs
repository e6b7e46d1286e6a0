//! Batch inputs: similarity matrices paired with their segment timings
//!
//! Built once per run and never mutated afterwards.

use std::fs;
use std::path::Path;

use log::{debug, info};
use ndarray::Array2;
use ndarray_npy::{read_npy, ReadNpyError};

use crate::error::{ClusterError, Result};
use crate::segments::{Segment, SegmentTable};

/// One recording: its similarity matrix and ordered segments
#[derive(Debug, Clone)]
pub struct Recording {
    pub id: String,
    pub similarity: Array2<f64>,
    pub segments: Vec<Segment>,
}

/// Immutable set of recordings processed by a sweep, sorted by id
#[derive(Debug, Clone, Default)]
pub struct SimilarityCorpus {
    recordings: Vec<Recording>,
}

impl SimilarityCorpus {
    /// Load every `*.npy` matrix in `mat_dir` and pair it with the segment table
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(mat_dir: P, segments: Q) -> Result<Self> {
        let matrices = load_matrices(mat_dir.as_ref())?;
        let table = SegmentTable::load(segments.as_ref())?;
        let corpus = Self::from_parts(matrices, &table)?;
        info!(
            "Loaded {} recordings ({} segments) from {}",
            corpus.len(),
            table.len(),
            mat_dir.as_ref().display()
        );
        Ok(corpus)
    }

    /// Pair `(recording_id, matrix)` entries with the table and validate.
    ///
    /// Fails when the number of distinct recordings in the table differs
    /// from the number of matrices, when a matrix has no segments, or when
    /// a matrix side does not match its segment count.
    pub fn from_parts(
        mut matrices: Vec<(String, Array2<f64>)>,
        table: &SegmentTable,
    ) -> Result<Self> {
        let table_ids = table.recording_ids();
        if table_ids.len() != matrices.len() {
            return Err(ClusterError::RecordingCountMismatch {
                segment_recordings: table_ids.len(),
                matrices: matrices.len(),
            });
        }

        matrices.sort_by(|a, b| a.0.cmp(&b.0));

        let mut recordings = Vec::with_capacity(matrices.len());
        for (id, similarity) in matrices {
            let (rows, cols) = similarity.dim();
            if rows != cols {
                return Err(ClusterError::NotSquare { rows, cols });
            }
            if !table_ids.contains(id.as_str()) {
                return Err(ClusterError::MissingSegments(id));
            }
            let segments = table.segments_for(&id);
            if segments.len() != rows {
                return Err(ClusterError::SegmentCountMismatch {
                    recording: id,
                    matrix_len: rows,
                    segments: segments.len(),
                });
            }
            recordings.push(Recording {
                id,
                similarity,
                segments,
            });
        }

        Ok(Self { recordings })
    }

    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }
}

/// Read all `*.npy` files in `dir`; the file stem is the recording id
pub fn load_matrices(dir: &Path) -> Result<Vec<(String, Array2<f64>)>> {
    let mut matrices = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("npy") {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let matrix = load_matrix(&path)?;
        debug!("{}: {}x{} similarity matrix", id, matrix.nrows(), matrix.ncols());
        matrices.push((id.to_string(), matrix));
    }

    Ok(matrices)
}

/// Read a 2-D float64 or float32 `.npy` array as float64
pub fn load_matrix(path: &Path) -> Result<Array2<f64>> {
    let npy_error = |source| ClusterError::Npy {
        path: path.to_path_buf(),
        source,
    };

    match read_npy::<_, Array2<f64>>(path) {
        Ok(matrix) => Ok(matrix),
        Err(ReadNpyError::WrongDescriptor(_)) => {
            let matrix: Array2<f32> = read_npy(path).map_err(npy_error)?;
            Ok(matrix.mapv(f64::from))
        }
        Err(e) => Err(npy_error(e)),
    }
}
