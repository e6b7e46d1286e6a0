//! Similarity enhancement - symmetrization, diffusion, max normalization
//!
//! Sharpens the block structure of a raw segment-affinity matrix before it
//! is handed to the spectral estimator.

use ndarray::{Array1, Array2, Axis};

/// Enhanced matrix together with the per-column scale it was divided by
#[derive(Debug, Clone)]
pub struct Enhanced {
    pub matrix: Array2<f64>,
    pub column_max: Array1<f64>,
}

/// `Y[i][j] = max(S[i][j], S[j][i])`
pub fn symmetrize(matrix: &Array2<f64>) -> Array2<f64> {
    let mut out = matrix.clone();
    out.zip_mut_with(&matrix.t(), |a, &b| {
        if b > *a {
            *a = b;
        }
    });
    out
}

/// `Y <- Y * Y^T`
pub fn diffuse(matrix: &Array2<f64>) -> Array2<f64> {
    matrix.dot(&matrix.t())
}

/// Maximum of every column (reduction over axis 0)
pub fn column_max(matrix: &Array2<f64>) -> Array1<f64> {
    matrix.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v))
}

/// Divide each entry by the maximum of its *column*.
///
/// NOTE: this is named and used as the row-max normalization step, but the
/// maximum is taken over axis 0, i.e. `Y[i][j] / max_k Y[k][j]`. Clustering
/// output depends on this choice, so it is kept as is. Because the input is
/// symmetric after diffusion, the result is only symmetric when all column
/// maxima are equal.
pub fn row_max_norm(matrix: &Array2<f64>) -> Array2<f64> {
    matrix / &column_max(matrix)
}

/// Full enhancement chain: symmetrize, diffuse, normalize
pub fn enhance(matrix: &Array2<f64>) -> Array2<f64> {
    enhance_with_scale(matrix).matrix
}

/// Same as [`enhance`] but also returns the column maxima used for the
/// final normalization. The spectral estimator needs them to recover a
/// symmetric form of the Laplacian.
pub fn enhance_with_scale(matrix: &Array2<f64>) -> Enhanced {
    let diffused = diffuse(&symmetrize(matrix));
    let column_max = column_max(&diffused);
    let matrix = &diffused / &column_max;
    Enhanced { matrix, column_max }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_symmetrize_is_symmetric() {
        let s = array![[1.0, 0.2, -3.0], [0.9, 1.0, 0.1], [0.5, 0.4, 1.0]];
        let y = symmetrize(&s);

        assert_eq!(y, y.t());
        assert_eq!(y[[0, 1]], 0.9);
        assert_eq!(y[[0, 2]], 0.5);
        assert_eq!(y[[1, 2]], 0.4);
    }

    #[test]
    fn test_diffuse() {
        let y = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(diffuse(&y), array![[5.0, 11.0], [11.0, 25.0]]);
    }

    #[test]
    fn test_normalization_uses_column_max() {
        // Column maxima are 4 and 8; row maxima would be 8 and 4.
        let y = array![[2.0, 8.0], [4.0, 2.0]];
        let normed = row_max_norm(&y);

        assert_eq!(normed, array![[0.5, 1.0], [1.0, 0.25]]);
    }

    #[test]
    fn test_enhance_non_negative() {
        let s = array![
            [1.0, 0.8, 0.1, 0.0],
            [0.7, 1.0, 0.2, 0.1],
            [0.0, 0.3, 1.0, 0.9],
            [0.1, 0.0, 0.8, 1.0]
        ];
        let enhanced = enhance(&s);

        assert_eq!(enhanced.dim(), (4, 4));
        assert!(enhanced.iter().all(|&v| v >= 0.0));
        // Every column reaches exactly 1 after normalization
        for col in enhanced.columns() {
            let max = col.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!((max - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_enhance_with_scale_matches_enhance() {
        let s = array![[1.0, 0.5], [0.2, 1.0]];
        let Enhanced { matrix, column_max } = enhance_with_scale(&s);

        assert_eq!(matrix, enhance(&s));
        // sym -> [[1, .5], [.5, 1]], diffused -> [[1.25, 1.0], [1.0, 1.25]]
        assert_eq!(column_max, array![1.25, 1.25]);
    }
}
