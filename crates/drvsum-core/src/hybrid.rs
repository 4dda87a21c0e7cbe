//! Hybrid combiner: spectral self-folds, then direct convolution.
//!
//! Each repeated variable is collapsed into its own r-fold sum with the spectral
//! technique, where exponentiation pays off. The distinct variables that remain are
//! then combined with the grid convolution reducer, so heterogeneous distributions
//! are never transformed together.

use crate::convolution::grid_convolution_sum;
use crate::distribution::{Distribution, Weighted};
use crate::error::SumError;
use crate::spectral::spectral_sum;
use crate::validate::check_repetitions;

/// Sum of Σ rᵢ·Xᵢ using a per-variable spectral pre-pass and grid convolution.
///
/// Every repetition count is checked before any computation starts; a count below
/// one or above [`MAX_REPETITIONS`](crate::validate::MAX_REPETITIONS) fails with
/// [`SumError::InvalidRepetitions`].
pub fn hybrid_sum<I>(weighted: I, delta: f64) -> Result<Distribution, SumError>
where
    I: IntoIterator<Item = Weighted>,
{
    let weighted: Vec<Weighted> = weighted.into_iter().collect();
    check_repetitions(&weighted)?;

    let mut distinct = Vec::with_capacity(weighted.len());
    for (index, w) in weighted.into_iter().enumerate() {
        if w.repetitions == 1 {
            distinct.push(w.distribution);
            continue;
        }
        let repetitions = w.repetitions;
        let folded = spectral_sum([w], delta).map_err(|err| match err {
            SumError::EmptyDistribution { .. } => SumError::EmptyDistribution { index },
            other => other,
        })?;
        log::debug!(
            "hybrid: distribution {index} folded {repetitions}x -> {} grid points",
            folded.len()
        );
        distinct.push(folded);
    }

    grid_convolution_sum(distinct, delta)
}
