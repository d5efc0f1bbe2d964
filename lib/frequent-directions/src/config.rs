//! Sketch configuration.

use serde::Deserialize;

/// Number of decimal digits a buffer row sum is rounded to when testing whether the row is free.
pub const DEFAULT_ZERO_ROW_DECIMALS: u32 = 7;

const fn default_zero_row_decimals() -> u32 {
    DEFAULT_ZERO_ROW_DECIMALS
}

/// Configuration for a [`FrequentDirections`][crate::FrequentDirections] sketch.
///
/// Only `ell` is required. When deserialized, unset fields take the same defaults as
/// [`FrequentDirections::new`][crate::FrequentDirections::new].
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SketchConfig {
    /// Number of rows retained in the finished sketch.
    pub ell: usize,

    /// Additional buffer rows kept before a shrink is triggered.
    ///
    /// Defaults to `2 * ell + 1`.
    #[serde(default)]
    pub k: Option<usize>,

    /// Decimal digits used by the numerical-zero test that finds free rows after a shrink.
    ///
    /// A row is considered free when its row sum, rounded (half to even) to this many decimal digits, equals zero. The
    /// default of 7 absorbs floating-point noise left by the decomposition but is not derived from any error bound, so
    /// it can be tightened or loosened for unusually scaled data.
    #[serde(default = "default_zero_row_decimals")]
    pub zero_row_decimals: u32,

    /// Upper bound on the number of iterations of the singular value decomposition.
    ///
    /// Zero means unbounded.
    #[serde(default)]
    pub max_svd_iterations: usize,
}

impl SketchConfig {
    /// Creates a configuration with the given sketch size and defaults for everything else.
    pub fn new(ell: usize) -> Self {
        Self {
            ell,
            k: None,
            zero_row_decimals: DEFAULT_ZERO_ROW_DECIMALS,
            max_svd_iterations: 0,
        }
    }

    /// Sets the buffer slack.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    /// Sets the number of decimal digits used to detect free rows.
    pub fn with_zero_row_decimals(mut self, decimals: u32) -> Self {
        self.zero_row_decimals = decimals;
        self
    }

    /// Sets the iteration limit of the singular value decomposition.
    pub fn with_max_svd_iterations(mut self, iterations: usize) -> Self {
        self.max_svd_iterations = iterations;
        self
    }

    /// Returns the buffer slack, resolving the default of `2 * ell + 1` when unset.
    ///
    /// Returns `None` if the default does not fit in a `usize`.
    pub fn resolved_k(&self) -> Option<usize> {
        self.k.or_else(|| self.ell.checked_mul(2)?.checked_add(1))
    }
}
