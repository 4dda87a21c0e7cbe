//! Opt-in precondition checks.
//!
//! The combiners trust their callers: grid spacing, ordering and normalization are
//! not verified on the hot path. These functions let a caller reject malformed input
//! up front. [`crate::sum`] runs them when [`crate::SumOptions::validate`] is set.

use crate::distribution::{Distribution, Weighted};
use crate::error::SumError;

/// Default absolute tolerance for grid and normalization checks.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Largest repetition count accepted; the spectral exponent is a `u32`.
pub const MAX_REPETITIONS: i64 = u32::MAX as i64;

/// Check that every distribution is non-empty, strictly ascending, spaced by
/// `delta`, and sits on the lattice anchored at the first distribution's minimum.
pub fn check_grid<'a, I>(distributions: I, delta: f64, tolerance: f64) -> Result<(), SumError>
where
    I: IntoIterator<Item = &'a Distribution>,
{
    if !(delta.is_finite() && delta > 0.0) {
        return Err(SumError::InvalidDelta { delta });
    }

    let mut origin = None;
    for (index, dist) in distributions.into_iter().enumerate() {
        let values = dist.values();
        let Some(&start) = values.first() else {
            return Err(SumError::EmptyDistribution { index });
        };

        for (row, pair) in values.windows(2).enumerate() {
            let step = pair[1] - pair[0];
            if step.is_nan() || step <= 0.0 {
                return Err(SumError::NotSorted {
                    index,
                    row: row + 1,
                });
            }
            if (step - delta).abs() > tolerance {
                return Err(SumError::UnevenSpacing {
                    index,
                    row: row + 1,
                    step,
                    delta,
                });
            }
        }

        let anchor = *origin.get_or_insert(start);
        let offset = (start - anchor) / delta;
        if (offset - offset.round()).abs() * delta > tolerance {
            return Err(SumError::Misaligned {
                index,
                start,
                delta,
            });
        }
    }

    match origin {
        Some(_) => Ok(()),
        None => Err(SumError::EmptyInput),
    }
}

/// Check that each distribution's probabilities sum to one within `eps`.
pub fn check_normalized<'a, I>(distributions: I, eps: f64) -> Result<(), SumError>
where
    I: IntoIterator<Item = &'a Distribution>,
{
    for (index, dist) in distributions.into_iter().enumerate() {
        let total = dist.total_probability();
        if (total - 1.0).abs() > eps {
            return Err(SumError::NotNormalized { index, total });
        }
    }
    Ok(())
}

/// Check that every repetition count lies in `1..=MAX_REPETITIONS`.
pub fn check_repetitions(weighted: &[Weighted]) -> Result<(), SumError> {
    match weighted
        .iter()
        .position(|w| !(1..=MAX_REPETITIONS).contains(&w.repetitions))
    {
        Some(index) => Err(SumError::InvalidRepetitions {
            index,
            repetitions: weighted[index].repetitions,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_grids_pass() {
        let a = Distribution::on_grid(0.0, 0.5, vec![0.5, 0.5]);
        let b = Distribution::on_grid(-1.5, 0.5, vec![0.25, 0.5, 0.25]);
        assert_eq!(check_grid([&a, &b], 0.5, DEFAULT_TOLERANCE), Ok(()));
    }

    #[test]
    fn test_unsorted_is_reported() {
        let d = Distribution::from_pairs([(0.0, 0.5), (2.0, 0.25), (1.0, 0.25)]);
        assert_eq!(
            check_grid([&d], 1.0, DEFAULT_TOLERANCE),
            Err(SumError::NotSorted { index: 0, row: 2 })
        );
    }

    #[test]
    fn test_wrong_delta_is_reported() {
        let d = Distribution::on_grid(0.0, 2.0, vec![0.5, 0.5]);
        assert!(matches!(
            check_grid([&d], 1.0, DEFAULT_TOLERANCE),
            Err(SumError::UnevenSpacing { index: 0, row: 1, .. })
        ));
    }

    #[test]
    fn test_misaligned_is_reported() {
        let a = Distribution::on_grid(0.0, 1.0, vec![0.5, 0.5]);
        let b = Distribution::on_grid(0.5, 1.0, vec![0.5, 0.5]);
        assert_eq!(
            check_grid([&a, &b], 1.0, DEFAULT_TOLERANCE),
            Err(SumError::Misaligned {
                index: 1,
                start: 0.5,
                delta: 1.0
            })
        );
    }

    #[test]
    fn test_empty_cases() {
        assert_eq!(
            check_grid(std::iter::empty(), 1.0, DEFAULT_TOLERANCE),
            Err(SumError::EmptyInput)
        );
        let empty = Distribution::default();
        assert_eq!(
            check_grid([&empty], 1.0, DEFAULT_TOLERANCE),
            Err(SumError::EmptyDistribution { index: 0 })
        );
        assert_eq!(
            check_grid([&empty], -1.0, DEFAULT_TOLERANCE),
            Err(SumError::InvalidDelta { delta: -1.0 })
        );
    }

    #[test]
    fn test_normalization() {
        let good = Distribution::uniform([1.0, 2.0, 3.0]);
        let bad = Distribution::from_pairs([(0.0, 0.5), (1.0, 0.4)]);
        assert_eq!(check_normalized([&good], DEFAULT_TOLERANCE), Ok(()));
        assert!(matches!(
            check_normalized([&good, &bad], DEFAULT_TOLERANCE),
            Err(SumError::NotNormalized { index: 1, .. })
        ));
    }

    #[test]
    fn test_repetitions() {
        let d = Distribution::uniform([0.0, 1.0]);
        assert_eq!(check_repetitions(&[Weighted::new(d.clone(), 4)]), Ok(()));
        assert_eq!(
            check_repetitions(&[Weighted::once(d.clone()), Weighted::new(d.clone(), -2)]),
            Err(SumError::InvalidRepetitions {
                index: 1,
                repetitions: -2
            })
        );
        assert_eq!(
            check_repetitions(&[Weighted::new(d.clone(), MAX_REPETITIONS)]),
            Ok(())
        );
        assert_eq!(
            check_repetitions(&[Weighted::new(d, MAX_REPETITIONS + 1)]),
            Err(SumError::InvalidRepetitions {
                index: 0,
                repetitions: MAX_REPETITIONS + 1
            })
        );
    }
}
