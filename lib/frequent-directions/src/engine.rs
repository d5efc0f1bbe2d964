//! Incremental Frequent Directions sketch.

use ndarray::{s, Array2, ArrayView1, ArrayView2};
use snafu::{ensure, OptionExt as _};
use tracing::{debug, trace};

use crate::config::SketchConfig;
use crate::error::{
    BufferSizeOverflow, InsufficientRows, InvalidBufferSlack, InvalidSketchSize, RowDimensionMismatch, SketchError,
    SketchSizeTooLarge,
};
use crate::free_rows::FreeRows;
use crate::shrink::shrink;

/// Buffer state, allocated once the first row fixes the dimension.
#[derive(Clone, Debug)]
struct Buffer {
    rows: Array2<f64>,
    free_rows: FreeRows,
}

/// A deterministic streaming matrix sketch.
///
/// Rows are accepted one at a time into a buffer of `ell + k` rows. Whenever the buffer fills up, it is shrunk through a
/// singular value decomposition so that at most `ell` rows remain occupied, and the freed rows receive subsequent input.
/// Memory use is fixed at `(ell + k) × M` values once the first row has established the dimension `M`.
///
/// For an input matrix `A` and finished sketch `B`, the covariance error `‖AᵀA − BᵀB‖₂` is bounded by `‖A‖²_F / ell`
/// when the sketch is finished directly after a shrink.
///
/// The algorithm is described in Edo Liberty, "Simple and Deterministic Matrix Sketching", ACM SIGKDD, 2013.
///
/// # Example
///
/// ```
/// use frequent_directions::FrequentDirections;
///
/// let mut sketch = FrequentDirections::new(2, None).unwrap();
/// for i in 0..8 {
///     let x = i as f64;
///     sketch.add(&[x, 1.0, x * x, -x]).unwrap();
/// }
///
/// let b = sketch.finalize().unwrap();
/// assert_eq!(b.dim(), (2, 4));
/// ```
#[derive(Clone, Debug)]
pub struct FrequentDirections {
    config: SketchConfig,
    ell: usize,
    k: usize,
    rows_seen: u64,
    shrinks: u64,
    buffer: Option<Buffer>,
}

impl FrequentDirections {
    /// Creates a new, uninitialized sketch retaining `ell` rows.
    ///
    /// `k` is the number of additional buffer rows kept before a shrink occurs, defaulting to `2 * ell + 1`.
    ///
    /// # Errors
    ///
    /// If `ell` or `k` is zero, or `ell + k` overflows, an error is returned.
    pub fn new(ell: usize, k: Option<usize>) -> Result<Self, SketchError> {
        let mut config = SketchConfig::new(ell);
        config.k = k;
        Self::from_config(config)
    }

    /// Creates a new, uninitialized sketch from the given configuration.
    ///
    /// # Errors
    ///
    /// If `ell` or the resolved `k` is zero, or `ell + k` overflows, an error is returned.
    pub fn from_config(config: SketchConfig) -> Result<Self, SketchError> {
        let ell = config.ell;
        ensure!(ell > 0, InvalidSketchSize { ell });
        let k = config.resolved_k().context(BufferSizeOverflow { ell })?;
        ensure!(k > 0, InvalidBufferSlack);
        ensure!(ell.checked_add(k).is_some(), BufferSizeOverflow { ell });

        Ok(Self {
            config,
            ell,
            k,
            rows_seen: 0,
            shrinks: 0,
            buffer: None,
        })
    }

    /// Returns the number of rows retained by the finished sketch.
    pub fn ell(&self) -> usize {
        self.ell
    }

    /// Returns the number of additional buffer rows.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the total number of rows in the working buffer (`ell + k`).
    pub fn buffer_rows(&self) -> usize {
        self.ell + self.k
    }

    /// Returns the configuration this sketch was created from.
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Returns `true` if the first row has been added and the buffer allocated.
    pub fn is_initialized(&self) -> bool {
        self.buffer.is_some()
    }

    /// Returns the row dimension, if established.
    pub fn dimension(&self) -> Option<usize> {
        self.buffer.as_ref().map(|buffer| buffer.rows.ncols())
    }

    /// Returns the number of rows added so far.
    pub fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    /// Returns the number of shrinks performed so far.
    pub fn shrink_count(&self) -> u64 {
        self.shrinks
    }

    /// Returns the number of buffer rows currently free to receive input.
    ///
    /// Before initialization, this is the full buffer size.
    pub fn free_row_count(&self) -> usize {
        self.buffer
            .as_ref()
            .map_or_else(|| self.buffer_rows(), |buffer| buffer.free_rows.len())
    }

    /// Returns a view of the working buffer, if allocated.
    pub fn buffer(&self) -> Option<ArrayView2<'_, f64>> {
        self.buffer.as_ref().map(|buffer| buffer.rows.view())
    }

    /// Adds a row to the sketch.
    ///
    /// The first row added establishes the dimension `M` of the sketch. If adding the row fills the buffer, the buffer
    /// is shrunk before returning.
    ///
    /// # Errors
    ///
    /// If this is the first row and `ell` is not smaller than its length, or if the row length differs from the
    /// established dimension, an error is returned. If the shrink fails to converge, an error is returned. In every
    /// case the sketch is left exactly as it was before the call.
    pub fn add(&mut self, row: &[f64]) -> Result<(), SketchError> {
        self.add_row(ArrayView1::from(row))
    }

    /// Adds a row, given as an `ndarray` view, to the sketch.
    ///
    /// # Errors
    ///
    /// See [`add`][Self::add].
    pub fn add_row(&mut self, row: ArrayView1<'_, f64>) -> Result<(), SketchError> {
        let dimension = row.len();
        match self.dimension() {
            Some(expected) => ensure!(
                expected == dimension,
                RowDimensionMismatch {
                    expected,
                    actual: dimension
                }
            ),
            None => self.initialize(dimension)?,
        }

        let ell = self.ell;
        let zero_row_decimals = self.config.zero_row_decimals;
        let max_svd_iterations = self.config.max_svd_iterations;
        let Some(buffer) = self.buffer.as_mut() else {
            unreachable!("buffer is allocated by initialize");
        };

        // A full buffer is always shrunk before `add` returns, so there is a free row here.
        let Some(index) = buffer.free_rows.take_first() else {
            unreachable!("buffer has no free rows outside of a shrink");
        };
        buffer.rows.row_mut(index).assign(&row);
        trace!(index, rows_seen = self.rows_seen, "Added row to sketch buffer.");

        if buffer.free_rows.is_empty() {
            match shrink(buffer.rows.view(), ell, zero_row_decimals, max_svd_iterations) {
                Ok(shrunk) => {
                    buffer.rows = shrunk.buffer;
                    buffer.free_rows = shrunk.free_rows;
                    self.shrinks += 1;
                    debug!(
                        threshold = shrunk.threshold,
                        free_rows = buffer.free_rows.len(),
                        shrinks = self.shrinks,
                        "Shrunk sketch buffer."
                    );
                }
                Err(e) => {
                    buffer.rows.row_mut(index).fill(0.0);
                    buffer.free_rows.restore_first(index);
                    return Err(e);
                }
            }
        }

        self.rows_seen += 1;
        Ok(())
    }

    /// Adds every row of `rows` to the sketch, in order.
    ///
    /// # Errors
    ///
    /// If the column count of `rows` does not match the established dimension (or is not larger than `ell`, for an
    /// uninitialized sketch), an error is returned before any row is added. If a shrink fails, an error is returned and
    /// the rows before the failing one remain added.
    pub fn add_rows(&mut self, rows: ArrayView2<'_, f64>) -> Result<(), SketchError> {
        let dimension = rows.ncols();
        match self.dimension() {
            Some(expected) => ensure!(
                expected == dimension,
                RowDimensionMismatch {
                    expected,
                    actual: dimension
                }
            ),
            None => ensure!(
                self.ell < dimension,
                SketchSizeTooLarge {
                    ell: self.ell,
                    dimension
                }
            ),
        }

        for row in rows.rows() {
            self.add_row(row)?;
        }

        Ok(())
    }

    /// Returns the finished sketch: the first `ell` rows of the working buffer.
    ///
    /// The sketch is not modified.
    ///
    /// # Errors
    ///
    /// If no more than `ell + k` rows have been added, the buffer has not yet gone through a full cycle and an error is
    /// returned.
    pub fn finalize(&self) -> Result<Array2<f64>, SketchError> {
        let required = self.buffer_rows() as u64;
        ensure!(
            self.rows_seen > required,
            InsufficientRows {
                consumed: self.rows_seen,
                required
            }
        );

        match self.buffer.as_ref() {
            Some(buffer) => Ok(buffer.rows.slice(s![..self.ell, ..]).to_owned()),
            None => unreachable!("rows were consumed, so the buffer is allocated"),
        }
    }

    /// Returns the finished sketch and resets the engine for reuse.
    ///
    /// # Errors
    ///
    /// See [`finalize`][Self::finalize]. On error, the sketch is not reset.
    pub fn finalize_and_reset(&mut self) -> Result<Array2<f64>, SketchError> {
        let result = self.finalize()?;
        self.reset();
        Ok(result)
    }

    /// Returns the engine to its just-constructed state.
    ///
    /// `ell`, `k`, and the rest of the configuration are kept. The dimension, row count, and buffer are cleared.
    pub fn reset(&mut self) {
        debug!(
            rows_seen = self.rows_seen,
            shrinks = self.shrinks,
            "Resetting sketch."
        );

        self.rows_seen = 0;
        self.shrinks = 0;
        self.buffer = None;
    }

    fn initialize(&mut self, dimension: usize) -> Result<(), SketchError> {
        ensure!(
            self.ell < dimension,
            SketchSizeTooLarge {
                ell: self.ell,
                dimension
            }
        );

        let rows = self.buffer_rows();
        self.buffer = Some(Buffer {
            rows: Array2::zeros((rows, dimension)),
            free_rows: FreeRows::all(rows),
        });
        self.rows_seen = 0;

        debug!(ell = self.ell, k = self.k, dimension, "Initialized sketch buffer.");
        Ok(())
    }
}
