//! General pairwise combiner.
//!
//! Sums two variables at a time through their full bivariate joint distribution:
//! every pairwise sum of outcomes carries the product of the two probabilities, and
//! rows landing on the same sum are merged. No assumption is made about spacing or
//! alignment of the sample spaces.
//!
//! Cost is O(n·m) time and memory per merge step, where n and m are the support
//! sizes of the two operands. With many wide distributions the intermediate
//! supports compound, so prefer the grid strategies when the inputs share a grid.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::distribution::Distribution;
use crate::error::SumError;

/// How rows of the joint distribution are grouped into one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Group sums that are bit-identical (`-0.0` and `0.0` count as equal).
    ///
    /// Sums that are mathematically equal but differ in their last bits stay
    /// separate rows, fragmenting the mass across near-duplicate outcomes.
    #[default]
    Exact,
    /// Sort the sums and fold every sum within `eps` of the first sum of its run
    /// into that run.
    Tolerance(f64),
    /// Quantize each sum to the nearest point of the operands' shared lattice,
    /// `origin + k·delta` with `origin` the sum of the two smallest values, before
    /// grouping. `delta` must be positive and finite.
    Grid { delta: f64 },
}

impl std::fmt::Display for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Tolerance(eps) => write!(f, "tolerance({eps})"),
            Self::Grid { delta } => write!(f, "grid({delta})"),
        }
    }
}

/// Sum of independent variables with exact-equality aggregation.
///
/// The worklist is taken by value; clone beforehand if the inputs are needed again.
/// A single distribution is returned sorted ascending by value.
pub fn pairwise_sum<I>(distributions: I) -> Result<Distribution, SumError>
where
    I: IntoIterator<Item = Distribution>,
{
    pairwise_sum_with(distributions, Aggregation::Exact)
}

/// Sum of independent variables, grouping joint outcomes with `aggregation`.
pub fn pairwise_sum_with<I>(
    distributions: I,
    aggregation: Aggregation,
) -> Result<Distribution, SumError>
where
    I: IntoIterator<Item = Distribution>,
{
    match aggregation {
        Aggregation::Grid { delta } if !(delta.is_finite() && delta > 0.0) => {
            return Err(SumError::InvalidDelta { delta });
        }
        _ => {}
    }
    let mut worklist: Vec<Distribution> = distributions.into_iter().collect();
    if let Some(index) = worklist.iter().position(Distribution::is_empty) {
        return Err(SumError::EmptyDistribution { index });
    }

    loop {
        let Some(x1) = worklist.pop() else {
            return Err(SumError::EmptyInput);
        };
        let Some(x2) = worklist.pop() else {
            return Ok(x1.sorted());
        };
        let merged = merge(&x1, &x2, aggregation);
        log::debug!(
            "pairwise: {}x{} joint rows -> {} outcomes ({aggregation}), {} left",
            x1.len(),
            x2.len(),
            merged.len(),
            worklist.len() + 1
        );
        worklist.push(merged);
    }
}

/// Distribution of X1 + X2, sorted ascending by value.
fn merge(x1: &Distribution, x2: &Distribution, aggregation: Aggregation) -> Distribution {
    let joint = x1
        .pairs()
        .flat_map(|(v1, p1)| x2.pairs().map(move |(v2, p2)| (v1 + v2, p1 * p2)));

    match aggregation {
        Aggregation::Exact => {
            let mut mass: HashMap<u64, (f64, f64)> = HashMap::with_capacity(x1.len() * x2.len());
            for (sum, p) in joint {
                // `+ 0.0` folds -0.0 onto 0.0 so both share one key.
                let sum = sum + 0.0;
                mass.entry(sum.to_bits()).or_insert((sum, 0.0)).1 += p;
            }
            let mut rows: Vec<(f64, f64)> = mass.into_values().collect();
            rows.sort_by(|a, b| a.0.total_cmp(&b.0));
            Distribution::from_pairs(rows)
        }
        Aggregation::Tolerance(eps) => {
            let mut rows: Vec<(f64, f64)> = joint.collect();
            rows.sort_by(|a, b| a.0.total_cmp(&b.0));
            let mut merged: Vec<(f64, f64)> = Vec::new();
            for (sum, p) in rows {
                match merged.last_mut() {
                    Some((anchor, mass)) if sum - *anchor <= eps => *mass += p,
                    _ => merged.push((sum, p)),
                }
            }
            Distribution::from_pairs(merged)
        }
        Aggregation::Grid { delta } => {
            let origin = match (x1.min_value(), x2.min_value()) {
                (Some(a), Some(b)) => a + b,
                _ => 0.0,
            };
            let mut mass: BTreeMap<i64, f64> = BTreeMap::new();
            for (sum, p) in joint {
                *mass
                    .entry(((sum - origin) / delta).round() as i64)
                    .or_insert(0.0) += p;
            }
            Distribution::from_pairs(mass.into_iter().map(|(k, p)| (origin + k as f64 * delta, p)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convolution::grid_convolution_sum;

    fn die() -> Distribution {
        Distribution::uniform((1..=6).map(f64::from))
    }

    #[test]
    fn test_two_dice() {
        let sum = pairwise_sum(vec![die(), die()]).unwrap();
        let expected: Vec<f64> = (2..=12).map(f64::from).collect();
        assert_eq!(sum.values(), expected.as_slice());
        for (i, &p) in sum.probabilities().iter().enumerate() {
            let ways = 6.0 - (i as f64 - 5.0).abs();
            assert!((p - ways / 36.0).abs() < 1e-12, "P({}) = {p}", i + 2);
        }
    }

    #[test]
    fn test_single_distribution_is_sorted() {
        let d = Distribution::from_pairs([(5.0, 0.1), (1.0, 0.6), (3.0, 0.3)]);
        let sum = pairwise_sum(vec![d]).unwrap();
        assert_eq!(sum.values(), &[1.0, 3.0, 5.0]);
        assert_eq!(sum.probabilities(), &[0.6, 0.3, 0.1]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(pairwise_sum(Vec::new()), Err(SumError::EmptyInput));
        assert_eq!(
            pairwise_sum(vec![die(), Distribution::default()]),
            Err(SumError::EmptyDistribution { index: 1 })
        );
    }

    #[test]
    fn test_irregular_support() {
        let a = Distribution::from_pairs([(0.0, 0.5), (10.0, 0.5)]);
        let b = Distribution::from_pairs([(-1.0, 0.25), (2.5, 0.75)]);
        let sum = pairwise_sum(vec![a, b]).unwrap();
        assert_eq!(sum.values(), &[-1.0, 2.5, 9.0, 12.5]);
        assert_eq!(sum.probabilities(), &[0.125, 0.375, 0.125, 0.375]);
    }

    #[test]
    fn test_negative_zero_merges_with_zero() {
        let a = Distribution::from_pairs([(-1.0, 0.5), (0.0, 0.5)]);
        let b = Distribution::from_pairs([(1.0, 0.5), (-0.0, 0.5)]);
        let sum = pairwise_sum(vec![a, b]).unwrap();
        assert_eq!(sum.values(), &[-1.0, 0.0, 1.0]);
        assert_eq!(sum.probabilities(), &[0.25, 0.5, 0.25]);
    }

    #[test]
    fn test_exact_aggregation_fragments_rounded_sums() {
        // 0.1 + 0.2 != 0.3 + 0.0 in binary floating point.
        let a = Distribution::from_pairs([(0.1, 0.5), (0.3, 0.5)]);
        let b = Distribution::from_pairs([(0.2, 0.5), (0.0, 0.5)]);

        let exact = pairwise_sum(vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(exact.len(), 4);

        let tolerant = pairwise_sum_with(vec![a.clone(), b.clone()], Aggregation::Tolerance(1e-9))
            .unwrap();
        assert_eq!(tolerant.len(), 3);
        assert!((tolerant.probability_of(0.3, 1e-9) - 0.5).abs() < 1e-12);

        let grid = pairwise_sum_with(vec![a, b], Aggregation::Grid { delta: 0.1 }).unwrap();
        assert_eq!(grid.len(), 3);
        assert!((grid.probability_of(0.3, 1e-12) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_grid_aggregation_keeps_offset_lattice() {
        let coin = Distribution::on_grid(0.1, 1.0, vec![0.5, 0.5]);
        let grid = pairwise_sum_with(
            vec![coin.clone(), coin.clone()],
            Aggregation::Grid { delta: 1.0 },
        )
        .unwrap();
        let conv = grid_convolution_sum(vec![coin.clone(), coin], 1.0).unwrap();
        assert_eq!(grid.len(), 3);
        for ((v, p), (w, q)) in grid.pairs().zip(conv.pairs()) {
            assert!((v - w).abs() < 1e-12, "value {v} vs {w}");
            assert!((p - q).abs() < 1e-12, "P({v}) = {p} vs {q}");
        }
        assert!((grid.values()[0] - 0.2).abs() < 1e-12);
        assert!((grid.probability_of(1.2, 1e-9) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_grid_aggregation_offset_three_way() {
        let a = Distribution::on_grid(-0.35, 0.5, vec![0.25, 0.5, 0.25]);
        let b = Distribution::on_grid(0.15, 0.5, vec![0.6, 0.4]);
        let c = Distribution::on_grid(1.15, 0.5, vec![0.1, 0.2, 0.3, 0.4]);
        let inputs = vec![a, b, c];
        let grid = pairwise_sum_with(inputs.clone(), Aggregation::Grid { delta: 0.5 }).unwrap();
        let conv = grid_convolution_sum(inputs, 0.5).unwrap();
        assert_eq!(grid.len(), conv.len());
        assert!((grid.values()[0] - 0.95).abs() < 1e-12);
        for ((v, p), (w, q)) in grid.pairs().zip(conv.pairs()) {
            assert!((v - w).abs() < 1e-9, "value {v} vs {w}");
            assert!((p - q).abs() < 1e-12, "P({v}) = {p} vs {q}");
        }
    }

    #[test]
    fn test_grid_aggregation_rejects_bad_delta() {
        for delta in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = pairwise_sum_with(vec![die(), die()], Aggregation::Grid { delta });
            assert!(
                matches!(result, Err(SumError::InvalidDelta { .. })),
                "delta {delta}: {result:?}"
            );
        }
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = Distribution::from_pairs([(0.0, 0.2), (1.0, 0.8)]);
        let b = Distribution::from_pairs([(3.0, 0.5), (1.0, 0.5)]);
        let c = Distribution::from_pairs([(2.0, 1.0)]);
        let abc = pairwise_sum(vec![a.clone(), b.clone(), c.clone()]).unwrap();
        let cab = pairwise_sum(vec![c, a, b]).unwrap();
        assert_eq!(abc.values(), cab.values());
        for (p, q) in abc.probabilities().iter().zip(cab.probabilities()) {
            assert!((p - q).abs() < 1e-12);
        }
    }
}
