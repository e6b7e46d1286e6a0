// Error types shared by the clustering pipeline
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClusterError>;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("invalid model type '{0}', expected one of: lstm, mask, lstmres")]
    InvalidModelType(String),

    #[error("invalid cluster type '{0}', expected one of: sc, ahc")]
    InvalidClusterType(String),

    /// The segment table and the matrix directory describe different corpora
    #[error(
        "segment table references {segment_recordings} recordings but {matrices} similarity matrices were loaded"
    )]
    RecordingCountMismatch {
        segment_recordings: usize,
        matrices: usize,
    },

    #[error("recording '{0}' has a similarity matrix but no rows in the segment table")]
    MissingSegments(String),

    #[error("recording '{recording}': similarity matrix has {matrix_len} rows but {segments} segments are listed")]
    SegmentCountMismatch {
        recording: String,
        matrix_len: usize,
        segments: usize,
    },

    #[error("similarity matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("spectral clustering selected zero clusters (no eigenvalue below beta = {beta})")]
    NoClusters { beta: f64 },

    #[error("non-finite values in {0}")]
    NonFinite(&'static str),

    #[error("k-means failed: {0}")]
    KMeans(#[from] linfa_clustering::KMeansError),

    #[error("eigendecomposition failed: {0}")]
    Eigen(#[from] linfa_linalg::LinalgError),

    #[error("{path}:{line}: {reason}")]
    MalformedSegmentLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("failed to read {path}: {source}")]
    Npy {
        path: PathBuf,
        #[source]
        source: ndarray_npy::ReadNpyError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
