//! # drvsum-core
//!
//! **The PMF of a sum of independent discrete random variables.**
//!
//! Given each variable's probability mass function as `(value, probability)` rows,
//! `drvsum-core` returns the distribution of their sum. Four interchangeable
//! strategies trade generality against speed:
//!
//! - [`pairwise_sum`]: full bivariate joint distribution, two at a time. Works on any
//!   support; O(n·m) per merge.
//! - [`grid_convolution_sum`]: direct discrete convolution, two at a time. Inputs
//!   must share an evenly spaced grid.
//! - [`spectral_sum`]: every input (raised to its repetition count) multiplied in the
//!   frequency domain, one inverse FFT. O(L log L) for output length L.
//! - [`hybrid_sum`]: spectral self-folds for repeated variables, then convolution
//!   across the distinct ones.
//!
//! ## Quick Start
//!
//! ```
//! use drvsum_core::{Distribution, Weighted, grid_convolution_sum, spectral_sum};
//!
//! let die = Distribution::uniform((1..=6).map(f64::from));
//!
//! // Two dice, listed separately
//! let two = grid_convolution_sum(vec![die.clone(), die.clone()], 1.0).unwrap();
//! assert_eq!(two.len(), 11);
//!
//! // Ten dice, as one variable repeated ten times
//! let ten = spectral_sum(vec![Weighted::new(die, 10)], 1.0).unwrap();
//! assert!((ten.mean() - 35.0).abs() < 1e-9);
//! ```
//!
//! ## Preconditions
//!
//! The combiners do not check grid spacing, ordering or normalization. Use
//! [`validate`] or set [`SumOptions::validate`] with [`sum`] to reject malformed
//! input up front. Empty input and repetition counts below one are always rejected.

pub mod convolution;
pub mod distribution;
pub mod error;
pub mod hybrid;
pub mod method;
pub mod pairwise;
pub mod spectral;
pub mod validate;

pub use convolution::{convolve, grid_convolution_sum};
pub use distribution::{Distribution, Weighted};
pub use error::SumError;
pub use hybrid::hybrid_sum;
pub use method::{Discrepancy, Method, ParseMethodError, SumOptions, compare, sum};
pub use pairwise::{Aggregation, pairwise_sum, pairwise_sum_with};
pub use spectral::{IMAGINARY_RESIDUE_TOLERANCE, SpectralOutput, spectral_fold, spectral_sum};

/// Grid spacing used when none is given.
pub const DEFAULT_DELTA: f64 = 1.0;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
