// Speaker clustering
// Maps a per-recording similarity matrix to one integer label per segment
//
// Two interchangeable estimators:
// - spectral: enhancement + Laplacian eigengap + k-means
// - agglomerative: average linkage on the raw matrix, cut at a distance

pub mod agglomerative;
pub mod laplacian;
pub mod similarity;
pub mod spectral;

use ndarray::Array2;

use crate::config::ClusterType;
use crate::error::{ClusterError, Result};

pub use agglomerative::{agglomerative_clustering, AgglomerativeEstimator};
pub use similarity::{diffuse, enhance, row_max_norm, symmetrize};
pub use spectral::{spectral_clustering, SpectralEstimator};

/// A clustering algorithm driven by a single hyperparameter
pub trait Estimator {
    fn name(&self) -> &'static str;

    /// One label per row of `similarity`. The matrix is never modified.
    fn estimate(&self, similarity: &Array2<f64>, param: f64) -> Result<Vec<usize>>;
}

/// Build the estimator selected on the command line
pub fn estimator_for(cluster_type: ClusterType, seed: u64) -> Box<dyn Estimator> {
    match cluster_type {
        ClusterType::Spectral => Box::new(SpectralEstimator::new(seed)),
        ClusterType::Agglomerative => Box::new(AgglomerativeEstimator),
    }
}

pub(crate) fn check_square(matrix: &Array2<f64>) -> Result<()> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(ClusterError::NotSquare { rows, cols });
    }
    Ok(())
}
