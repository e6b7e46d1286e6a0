//! Graph Laplacian and its eigendecomposition

use linfa_linalg::eigh::EighInto;
use ndarray::{Array1, Array2, Axis};

use crate::error::{ClusterError, Result};

/// Dense normalized Laplacian `I - D^-1/2 A D^-1/2`.
///
/// The diagonal of `adjacency` is ignored. Degrees are column sums, so a
/// non-symmetric adjacency is normalized by in-degree. Isolated nodes get a
/// zero diagonal entry instead of one.
pub fn normalized_laplacian(adjacency: &Array2<f64>) -> Array2<f64> {
    let mut lap = adjacency.clone();
    lap.diag_mut().fill(0.0);

    let mut degree = lap.sum_axis(Axis(0)).mapv(f64::sqrt);
    let isolated: Vec<bool> = degree.iter().map(|&d| d == 0.0).collect();
    for (d, &iso) in degree.iter_mut().zip(&isolated) {
        if iso {
            *d = 1.0;
        }
    }

    for ((i, j), v) in lap.indexed_iter_mut() {
        *v = -(*v / degree[j] / degree[i]);
    }
    for (i, &iso) in isolated.iter().enumerate() {
        lap[[i, i]] = if iso { 0.0 } else { 1.0 };
    }

    lap
}

/// Eigendecomposition of a matrix `M` for which `S^-1/2 M S^1/2` is
/// symmetric, with `S = diag(scale)`.
///
/// The Laplacian of an enhanced similarity matrix has this form: the
/// enhancer divides a symmetric matrix by its column maxima, and the
/// Laplacian only rescales rows and columns symmetrically. The spectrum is
/// therefore real and the eigenvectors of `M` are `S^1/2 u` for the
/// eigenvectors `u` of the symmetric form. They are returned as unit-norm
/// columns, in the order produced by the solver (unsorted).
pub fn eig_scaled_symmetric(
    matrix: &Array2<f64>,
    scale: &Array1<f64>,
) -> Result<(Array1<f64>, Array2<f64>)> {
    let sqrt_scale = scale.mapv(f64::sqrt);

    let mut sym = Array2::<f64>::zeros(matrix.raw_dim());
    for ((i, j), v) in sym.indexed_iter_mut() {
        *v = matrix[[i, j]] * sqrt_scale[j] / sqrt_scale[i];
    }
    // remove rounding asymmetry before handing to the symmetric solver
    let sym = (&sym + &sym.t()) * 0.5;

    if !sym.iter().all(|v| v.is_finite()) {
        return Err(ClusterError::NonFinite("graph laplacian"));
    }

    let (values, mut vectors) = sym.eigh_into()?;

    for (mut row, &s) in vectors.rows_mut().into_iter().zip(sqrt_scale.iter()) {
        row *= s;
    }
    for mut col in vectors.columns_mut() {
        let norm = col.dot(&col).sqrt();
        if norm > 0.0 {
            col /= norm;
        }
    }

    Ok((values, vectors))
}
