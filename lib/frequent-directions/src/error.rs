use snafu::Snafu;

/// Broad category of a [`SketchError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The sketch was configured or driven incorrectly by the caller.
    Configuration,

    /// A matrix or row had a shape incompatible with the sketch.
    Dimension,

    /// The singular value decomposition of the buffer did not converge.
    Decomposition,
}

/// Errors returned by the sketch engine and the error metrics.
#[derive(Debug, Snafu, Clone, PartialEq)]
#[snafu(context(suffix(false)))]
#[snafu(visibility(pub(crate)))]
pub enum SketchError {
    /// The sketch size was zero.
    #[snafu(display("Sketch size (ell) must be at least 1, got {}.", ell))]
    InvalidSketchSize {
        /// Requested sketch size.
        ell: usize,
    },

    /// The buffer slack was zero.
    #[snafu(display("Buffer slack (k) must be at least 1."))]
    InvalidBufferSlack,

    /// The buffer size `ell + k` does not fit in a `usize`.
    #[snafu(display("Buffer size (ell + k) overflows for ell={}.", ell))]
    BufferSizeOverflow {
        /// Requested sketch size.
        ell: usize,
    },

    /// The sketch was finalized before a full buffer cycle had been consumed.
    #[snafu(display(
        "Sketch requires more than {} rows before it can be finalized, only {} consumed.",
        required,
        consumed
    ))]
    InsufficientRows {
        /// Rows consumed so far.
        consumed: u64,

        /// Number of rows that must be exceeded (`ell + k`).
        required: u64,
    },

    /// The sketch size was not smaller than the row dimension.
    #[snafu(display(
        "Sketch size (ell) must be smaller than the row dimension, got ell={} for dimension {}.",
        ell,
        dimension
    ))]
    SketchSizeTooLarge {
        /// Configured sketch size.
        ell: usize,

        /// Row dimension of the first row.
        dimension: usize,
    },

    /// A row did not match the dimension established by the first row.
    #[snafu(display("Expected row of dimension {}, got {}.", expected, actual))]
    RowDimensionMismatch {
        /// Established row dimension.
        expected: usize,

        /// Dimension of the rejected row.
        actual: usize,
    },

    /// Two matrices that must share a column count did not.
    #[snafu(display("Matrices must have the same number of columns, got {} and {}.", left, right))]
    ColumnMismatch {
        /// Column count of the left-hand matrix.
        left: usize,

        /// Column count of the right-hand matrix.
        right: usize,
    },

    /// The singular value decomposition did not converge.
    #[snafu(display("Singular value decomposition of a {}x{} buffer failed to converge.", rows, columns))]
    DecompositionFailed {
        /// Rows in the decomposed matrix.
        rows: usize,

        /// Columns in the decomposed matrix.
        columns: usize,
    },
}

impl SketchError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSketchSize { .. }
            | Self::InvalidBufferSlack
            | Self::BufferSizeOverflow { .. }
            | Self::InsufficientRows { .. } => {
                ErrorKind::Configuration
            }
            Self::SketchSizeTooLarge { .. } | Self::RowDimensionMismatch { .. } | Self::ColumnMismatch { .. } => {
                ErrorKind::Dimension
            }
            Self::DecompositionFailed { .. } => ErrorKind::Decomposition,
        }
    }
}
