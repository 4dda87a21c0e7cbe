//! Error type shared by every combiner and the validation layer.

/// Errors reported by the summation strategies.
///
/// Only [`SumError::InvalidRepetitions`], [`SumError::InvalidDelta`], the
/// empty-input variants and [`SumError::LengthMismatch`] are raised by the
/// combiners themselves. The grid variants come from [`crate::validate`], which
/// callers opt into.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SumError {
    /// No distributions were supplied.
    #[error("at least one distribution is required")]
    EmptyInput,

    /// A distribution has no (value, probability) rows.
    #[error("distribution {index} has no rows")]
    EmptyDistribution { index: usize },

    /// Value and probability columns differ in length.
    #[error("{values} values but {probabilities} probabilities")]
    LengthMismatch { values: usize, probabilities: usize },

    /// Repetition count below one or above `u32::MAX`.
    #[error(
        "repetition count must be between 1 and 4294967295, got {repetitions} (distribution {index})"
    )]
    InvalidRepetitions { index: usize, repetitions: i64 },

    /// Grid spacing is not a positive finite number.
    #[error("grid spacing must be positive and finite, got {delta}")]
    InvalidDelta { delta: f64 },

    /// Values are not strictly ascending.
    #[error("distribution {index} is not sorted ascending at row {row}")]
    NotSorted { index: usize, row: usize },

    /// Consecutive values are not `delta` apart.
    #[error("distribution {index} steps by {step} at row {row}, expected {delta}")]
    UnevenSpacing {
        index: usize,
        row: usize,
        step: f64,
        delta: f64,
    },

    /// Distribution does not sit on the lattice of the first distribution.
    #[error("distribution {index} starts at {start}, off the shared grid of spacing {delta}")]
    Misaligned { index: usize, start: f64, delta: f64 },

    /// Probabilities do not sum to one.
    #[error("distribution {index} has total probability {total}")]
    NotNormalized { index: usize, total: f64 },
}
