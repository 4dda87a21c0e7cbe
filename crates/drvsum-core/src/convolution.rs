//! Grid convolution combiner.
//!
//! For variables on one shared grid of spacing `delta`, the PMF of a sum is the
//! discrete convolution of the probability vectors, placed on an axis starting at
//! the sum of the two minima. Inputs must be sorted ascending and evenly spaced by
//! `delta`; this is not checked here (see [`crate::validate::check_grid`]).

use crate::distribution::{Distribution, grid_axis};
use crate::error::SumError;

/// Sum of independent variables sharing grid spacing `delta`.
///
/// Reduces the worklist two at a time. A single distribution is returned as is.
pub fn grid_convolution_sum<I>(distributions: I, delta: f64) -> Result<Distribution, SumError>
where
    I: IntoIterator<Item = Distribution>,
{
    let mut worklist: Vec<Distribution> = distributions.into_iter().collect();
    if let Some(index) = worklist.iter().position(Distribution::is_empty) {
        return Err(SumError::EmptyDistribution { index });
    }

    loop {
        let Some(x1) = worklist.pop() else {
            return Err(SumError::EmptyInput);
        };
        let Some(x2) = worklist.pop() else {
            return Ok(x1);
        };
        let merged = convolve_pair(&x1, &x2, delta)?;
        log::debug!(
            "convolution: {} * {} -> {} grid points, {} left",
            x1.len(),
            x2.len(),
            merged.len(),
            worklist.len() + 1
        );
        worklist.push(merged);
    }
}

/// Distribution of X1 + X2 for two grid-aligned variables.
pub(crate) fn convolve_pair(
    x1: &Distribution,
    x2: &Distribution,
    delta: f64,
) -> Result<Distribution, SumError> {
    let (Some((min1, _)), Some((min2, _))) = (x1.grid_bounds(), x2.grid_bounds()) else {
        return Err(SumError::EmptyInput);
    };
    let probabilities = convolve(x1.probabilities(), x2.probabilities());
    // Runs from min1 + min2 to max1 + max2 when both inputs sit on the grid.
    let values = grid_axis(min1 + min2, delta, probabilities.len());
    Distribution::new(values, probabilities)
}

/// Full (non-truncated) discrete convolution, length `a.len() + b.len() - 1`.
///
/// Returns an empty vector when either input is empty.
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}
