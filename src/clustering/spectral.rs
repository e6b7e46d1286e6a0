//! Spectral clustering with eigengap-based speaker count

use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::{KMeans, KMeansInit};
use log::debug;
use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand_isaac::Isaac64Rng;

use super::laplacian::{eig_scaled_symmetric, normalized_laplacian};
use super::similarity::{enhance_with_scale, Enhanced};
use super::{check_square, Estimator};
use crate::error::{ClusterError, Result};

const KMEANS_RUNS: usize = 10;

/// Spectral estimator; the sweep parameter is the eigenvalue threshold `beta`
#[derive(Debug, Clone)]
pub struct SpectralEstimator {
    /// Seed for k-means++ initialisation
    pub seed: u64,
}

impl SpectralEstimator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for SpectralEstimator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Estimator for SpectralEstimator {
    fn name(&self) -> &'static str {
        "spectral"
    }

    fn estimate(&self, similarity: &Array2<f64>, beta: f64) -> Result<Vec<usize>> {
        spectral_clustering(similarity, beta, self.seed)
    }
}

/// Eigenvalues and the spectral embedding of an enhanced similarity matrix
#[derive(Debug, Clone)]
pub struct SpectralEmbedding {
    pub eigenvalues: Array1<f64>,
    pub eigenvectors: Array2<f64>,
}

impl SpectralEmbedding {
    pub fn from_similarity(similarity: &Array2<f64>) -> Result<Self> {
        check_square(similarity)?;

        let Enhanced {
            mut matrix,
            column_max,
        } = enhance_with_scale(similarity);
        matrix.diag_mut().fill(0.0);

        let laplacian = normalized_laplacian(&matrix);
        let (eigenvalues, eigenvectors) = eig_scaled_symmetric(&laplacian, &column_max)?;

        Ok(Self {
            eigenvalues,
            eigenvectors,
        })
    }

    /// Indices of eigenvalues strictly below `beta`, in decomposition order.
    /// No sort by magnitude is applied.
    pub fn selected(&self, beta: f64) -> Vec<usize> {
        self.eigenvalues
            .iter()
            .enumerate()
            .filter(|(_, &v)| v < beta)
            .map(|(i, _)| i)
            .collect()
    }

    /// Projection matrix: one row per segment, one column per selected
    /// eigenvector.
    pub fn projection(&self, beta: f64) -> Array2<f64> {
        self.eigenvectors.select(Axis(1), &self.selected(beta))
    }
}

/// Cluster segments by thresholding the Laplacian spectrum at `beta` and
/// running k-means on the retained eigenvectors.
pub fn spectral_clustering(similarity: &Array2<f64>, beta: f64, seed: u64) -> Result<Vec<usize>> {
    let embedding = SpectralEmbedding::from_similarity(similarity)?;
    let projection = embedding.projection(beta);
    let n_clusters = projection.ncols();

    debug!(
        "beta={:.4}: {} of {} eigenvalues selected",
        beta,
        n_clusters,
        embedding.eigenvalues.len()
    );

    if n_clusters == 0 {
        return Err(ClusterError::NoClusters { beta });
    }

    kmeans_labels(projection, n_clusters, seed)
}

/// k-means++ with restarts on the rows of `points`
pub fn kmeans_labels(points: Array2<f64>, n_clusters: usize, seed: u64) -> Result<Vec<usize>> {
    let rng = Isaac64Rng::seed_from_u64(seed);
    let dataset = DatasetBase::from(points);

    let model = KMeans::params_with_rng(n_clusters, rng)
        .n_runs(KMEANS_RUNS)
        .init_method(KMeansInit::KMeansPlusPlus)
        .fit(&dataset)?;
    let labels: Array1<usize> = model.predict(dataset.records());

    Ok(labels.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Two well separated speakers, three segments each
    fn two_speaker_matrix() -> Array2<f64> {
        let mut s = Array2::<f64>::from_elem((6, 6), 0.05);
        for i in 0..6 {
            for j in 0..6 {
                if (i < 3) == (j < 3) {
                    s[[i, j]] = 0.9;
                }
            }
        }
        s
    }

    fn distinct(labels: &[usize]) -> usize {
        let mut sorted = labels.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        sorted.len()
    }

    #[test]
    fn test_zero_clusters_is_an_error() {
        let s = two_speaker_matrix();
        let err = spectral_clustering(&s, -1.0, 0).unwrap_err();

        assert!(matches!(err, ClusterError::NoClusters { beta } if beta == -1.0));
    }

    #[test]
    fn test_two_speakers() {
        let s = two_speaker_matrix();
        let embedding = SpectralEmbedding::from_similarity(&s).unwrap();

        // Eigenvalues of a normalized Laplacian lie in [0, 2]
        assert!(embedding
            .eigenvalues
            .iter()
            .all(|&v| v > -1e-9 && v < 2.0 + 1e-9));

        let labels = spectral_clustering(&s, 1.0, 0).unwrap();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
        assert_eq!(distinct(&labels), 2);
    }

    #[test]
    fn test_selection_keeps_decomposition_order() {
        let embedding = SpectralEmbedding {
            eigenvalues: array![1.2, 0.1, 0.9, 0.0],
            eigenvectors: array![
                [1.0, 2.0, 3.0, 4.0],
                [5.0, 6.0, 7.0, 8.0]
            ],
        };

        assert_eq!(embedding.selected(1.0), vec![1, 2, 3]);
        assert_eq!(embedding.selected(0.9), vec![1, 3]);
        assert_eq!(
            embedding.projection(1.0),
            array![[2.0, 3.0, 4.0], [6.0, 7.0, 8.0]]
        );
    }

    #[test]
    fn test_deterministic_for_seed() {
        let s = two_speaker_matrix();
        let a = spectral_clustering(&s, 1.0, 7).unwrap();
        let b = spectral_clustering(&s, 1.0, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_non_square() {
        let s = Array2::<f64>::ones((2, 3));
        let err = SpectralEstimator::default().estimate(&s, 1.0).unwrap_err();
        assert!(matches!(err, ClusterError::NotSquare { rows: 2, cols: 3 }));
    }
}
