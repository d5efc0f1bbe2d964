//! Offline error metrics for evaluating a finished sketch against the matrix it summarizes.

use nalgebra::{linalg::SVD, DMatrix};
use ndarray::{Array2, ArrayView2};
use snafu::ensure;

use crate::error::{ColumnMismatch, SketchError};

/// Computes the covariance error `‖AᵀA − BᵀB‖₂` between an original matrix `a` and its sketch `b`.
///
/// The two matrices may have different row counts but must have the same number of columns.
///
/// # Errors
///
/// If the column counts differ, an error is returned.
pub fn spectral_reconstruction_error(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<f64, SketchError> {
    ensure!(
        a.ncols() == b.ncols(),
        ColumnMismatch {
            left: a.ncols(),
            right: b.ncols()
        }
    );

    let difference = a.t().dot(&a) - b.t().dot(&b);
    Ok(spectral_norm(&difference))
}

/// Computes `‖A‖²_F`, the sum of the squares of every entry of `a`.
pub fn squared_frobenius_norm(a: ArrayView2<'_, f64>) -> f64 {
    a.iter().map(|v| v * v).sum()
}

/// Computes the worst-case covariance error `‖A‖²_F / ell` of a sketch of `a` retaining `ell` rows.
pub fn error_bound(a: ArrayView2<'_, f64>, ell: usize) -> f64 {
    squared_frobenius_norm(a) / ell as f64
}

fn spectral_norm(matrix: &Array2<f64>) -> f64 {
    let (rows, columns) = matrix.dim();
    if rows == 0 || columns == 0 {
        return 0.0;
    }

    let matrix = DMatrix::from_fn(rows, columns, |i, j| matrix[[i, j]]);
    SVD::new(matrix, false, false).singular_values.max()
}
