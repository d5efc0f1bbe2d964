//! A Frequent Directions matrix sketch.
//!
//! Frequent Directions compresses a stream of row vectors of dimension `M` into an `ell × M` matrix whose covariance
//! `BᵀB` approximates the covariance `AᵀA` of the full stream, using a fixed `(ell + k) × M` working buffer.
//!
//! # Quick Start
//!
//! ```
//! use frequent_directions::{metrics, FrequentDirections};
//! use ndarray::Array2;
//!
//! let a = Array2::from_shape_fn((32, 6), |(i, j)| ((i * 7 + j * 3) % 11) as f64 - 5.0);
//!
//! let mut sketch = FrequentDirections::new(3, Some(4)).unwrap();
//! sketch.add_rows(a.view()).unwrap();
//! let b = sketch.finalize().unwrap();
//!
//! let error = metrics::spectral_reconstruction_error(a.view(), b.view()).unwrap();
//! let bound = metrics::error_bound(a.view(), sketch.ell());
//! println!("covariance error {} (bound {})", error, bound);
//! ```
#![deny(missing_docs)]

mod config;
pub use self::config::{SketchConfig, DEFAULT_ZERO_ROW_DECIMALS};

mod engine;
pub use self::engine::FrequentDirections;

mod error;
pub use self::error::{ErrorKind, SketchError};

mod free_rows;

pub mod metrics;

mod shrink;
