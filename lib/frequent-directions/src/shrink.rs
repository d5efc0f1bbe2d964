//! The shrink step of Frequent Directions.
//!
//! Given a full buffer `B = U · diag(σ) · Vᵀ`, the shrink replaces it with `diag(σ̃) · Vᵀ`, where
//! `σ̃ᵢ = sqrt(max(0, σᵢ² − σ_ell²))`. Every row from index `ell` onwards becomes zero, which frees at least `k` rows for
//! new input while removing at most `σ_ell²` of mass from any direction.

use nalgebra::{linalg::SVD, DMatrix, DVector};
use ndarray::{Array2, ArrayView1, ArrayView2};
use snafu::OptionExt as _;

use crate::error::{DecompositionFailed, SketchError};
use crate::free_rows::FreeRows;

/// Result of shrinking a full buffer.
pub(crate) struct Shrunk {
    /// Shrunk buffer, same shape as the input buffer.
    pub buffer: Array2<f64>,

    /// Rows of `buffer` that are numerically zero, in ascending order.
    pub free_rows: FreeRows,

    /// Squared singular value subtracted from every direction.
    pub threshold: f64,
}

/// Shrinks `buffer` so that at most `ell` of its rows remain nonzero.
///
/// `ell` must be smaller than both dimensions of `buffer`.
///
/// # Errors
///
/// If the decomposition does not converge within `max_iterations` iterations (zero meaning unbounded), an error is
/// returned and `buffer` is left untouched.
pub(crate) fn shrink(
    buffer: ArrayView2<'_, f64>, ell: usize, zero_row_decimals: u32, max_iterations: usize,
) -> Result<Shrunk, SketchError> {
    let (rows, columns) = buffer.dim();
    debug_assert!(ell < rows.min(columns));

    let svd = SVD::try_new(to_dmatrix(buffer), false, true, f64::EPSILON, max_iterations)
        .context(DecompositionFailed { rows, columns })?;
    let v_t = svd.v_t.context(DecompositionFailed { rows, columns })?;
    let sigma = &svd.singular_values;
    let order = descending_order(sigma);

    let threshold = sigma[order[ell]].powi(2);

    // Rows past the rank of the decomposition (when `columns < rows`) stay zero.
    let mut shrunk = Array2::zeros((rows, columns));
    for (row, &source) in order.iter().enumerate() {
        let scale = (sigma[source].powi(2) - threshold).max(0.0).sqrt();
        if scale == 0.0 {
            continue;
        }

        for column in 0..columns {
            shrunk[[row, column]] = scale * v_t[(source, column)];
        }
    }

    let free_rows = FreeRows::from_sorted(
        shrunk
            .rows()
            .into_iter()
            .enumerate()
            .filter(|(_, row)| is_free_row(row, zero_row_decimals))
            .map(|(index, _)| index),
    );

    Ok(Shrunk {
        buffer: shrunk,
        free_rows,
        threshold,
    })
}

/// Returns `true` if the sum of `row`, rounded half to even at `decimals` decimal digits, is zero.
pub(crate) fn is_free_row(row: &ArrayView1<'_, f64>, decimals: u32) -> bool {
    is_numerically_zero(row.sum(), decimals)
}

fn is_numerically_zero(value: f64, decimals: u32) -> bool {
    if value == 0.0 {
        return true;
    }

    let scale = 10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    (value * scale).round_ties_even() == 0.0
}

fn to_dmatrix(view: ArrayView2<'_, f64>) -> DMatrix<f64> {
    let (rows, columns) = view.dim();
    DMatrix::from_fn(rows, columns, |i, j| view[[i, j]])
}

// Decomposition routines are not uniformly guaranteed to sort their output, so impose the order here.
fn descending_order(sigma: &DVector<f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..sigma.len()).collect();
    order.sort_by(|&a, &b| sigma[b].total_cmp(&sigma[a]));
    order
}
