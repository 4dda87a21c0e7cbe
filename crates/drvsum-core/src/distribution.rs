//! Discrete distributions as paired value/probability columns.
//!
//! A [`Distribution`] is the only data model shared by the four combiners. Column 0
//! holds the outcomes, column 1 their probabilities. On the wire (serde) it is an
//! array of `[value, probability]` rows, the same 2-column shape used for inputs and
//! outputs alike.

use serde::{Deserialize, Serialize};

use crate::error::SumError;

/// Probability mass function of one discrete random variable.
///
/// Nothing here enforces normalization, uniqueness of values or grid alignment;
/// see [`crate::validate`] for the checks a caller can opt into.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct Distribution {
    values: Vec<f64>,
    probabilities: Vec<f64>,
}

impl Distribution {
    /// Build a distribution from its two columns.
    pub fn new(values: Vec<f64>, probabilities: Vec<f64>) -> Result<Self, SumError> {
        if values.len() != probabilities.len() {
            return Err(SumError::LengthMismatch {
                values: values.len(),
                probabilities: probabilities.len(),
            });
        }
        Ok(Self {
            values,
            probabilities,
        })
    }

    /// Build a distribution from `(value, probability)` rows.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (values, probabilities) = pairs.into_iter().unzip();
        Self {
            values,
            probabilities,
        }
    }

    /// Equal mass on every listed value.
    pub fn uniform<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        let p = 1.0 / values.len() as f64;
        let probabilities = vec![p; values.len()];
        Self {
            values,
            probabilities,
        }
    }

    /// Probabilities laid out on the grid `start, start + delta, start + 2·delta, ...`.
    pub fn on_grid(start: f64, delta: f64, probabilities: Vec<f64>) -> Self {
        Self {
            values: grid_axis(start, delta, probabilities.len()),
            probabilities,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Outcome column.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Probability column.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Iterate over `(value, probability)` rows in stored order.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }

    /// Smallest outcome, or `None` when empty.
    pub fn min_value(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// Largest outcome, or `None` when empty.
    pub fn max_value(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// First and last stored values. For a sorted grid these are the support bounds.
    pub(crate) fn grid_bounds(&self) -> Option<(f64, f64)> {
        Some((*self.values.first()?, *self.values.last()?))
    }

    /// Sum of the probability column.
    pub fn total_probability(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Expected value, Σ v·p.
    pub fn mean(&self) -> f64 {
        self.pairs().map(|(v, p)| v * p).sum()
    }

    /// Σ (v − mean)²·p.
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.pairs().map(|(v, p)| (v - mean) * (v - mean) * p).sum()
    }

    /// Total mass on rows whose value lies within `eps` of `value`.
    pub fn probability_of(&self, value: f64, eps: f64) -> f64 {
        self.pairs()
            .filter(|(v, _)| (v - value).abs() <= eps)
            .map(|(_, p)| p)
            .sum()
    }

    /// The same rows, ordered ascending by value.
    pub fn sorted(self) -> Self {
        if self.values.is_sorted_by(|a, b| a <= b) {
            return self;
        }
        let mut rows: Vec<(f64, f64)> = self.pairs().collect();
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self::from_pairs(rows)
    }
}

impl From<Vec<[f64; 2]>> for Distribution {
    fn from(rows: Vec<[f64; 2]>) -> Self {
        Self::from_pairs(rows.into_iter().map(|[v, p]| (v, p)))
    }
}

impl From<Distribution> for Vec<[f64; 2]> {
    fn from(dist: Distribution) -> Self {
        dist.pairs().map(|(v, p)| [v, p]).collect()
    }
}

/// A distribution paired with the number of independent copies of it in the sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weighted {
    #[serde(rename = "pmf")]
    pub distribution: Distribution,
    /// Signed so zero and negative counts can be represented and rejected.
    #[serde(default = "one")]
    pub repetitions: i64,
}

fn one() -> i64 {
    1
}

impl Weighted {
    pub fn new(distribution: Distribution, repetitions: i64) -> Self {
        Self {
            distribution,
            repetitions,
        }
    }

    /// A single copy.
    pub fn once(distribution: Distribution) -> Self {
        Self::new(distribution, 1)
    }
}

impl From<Distribution> for Weighted {
    fn from(distribution: Distribution) -> Self {
        Self::once(distribution)
    }
}

/// `len` points starting at `start`, `delta` apart.
///
/// Each point is computed from its index rather than by repeated addition so that
/// long axes do not accumulate drift.
pub(crate) fn grid_axis(start: f64, delta: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + i as f64 * delta).collect()
}
