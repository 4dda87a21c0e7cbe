//! Strategy selection, shared options, and result comparison.

use serde::{Deserialize, Serialize};

use crate::DEFAULT_DELTA;
use crate::convolution::grid_convolution_sum;
use crate::distribution::{Distribution, Weighted};
use crate::error::SumError;
use crate::hybrid::hybrid_sum;
use crate::pairwise::{Aggregation, pairwise_sum_with};
use crate::spectral::spectral_sum;
use crate::validate::{self, DEFAULT_TOLERANCE};

/// One of the four summation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Bivariate joint distribution, any support.
    Pairwise,
    /// Direct discrete convolution on a shared grid.
    Convolution,
    /// One pass in the frequency domain.
    Spectral,
    /// Spectral self-folds followed by convolution.
    Hybrid,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::Pairwise,
        Method::Convolution,
        Method::Spectral,
        Method::Hybrid,
    ];

    /// Whether the strategy requires a shared evenly spaced grid.
    pub fn needs_grid(self) -> bool {
        !matches!(self, Self::Pairwise)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pairwise => write!(f, "pairwise"),
            Self::Convolution => write!(f, "convolution"),
            Self::Spectral => write!(f, "spectral"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Unknown method name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown method {0:?}; expected pairwise, convolution, spectral or hybrid")]
pub struct ParseMethodError(pub String);

impl std::str::FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pairwise" | "bivariate" => Ok(Self::Pairwise),
            "convolution" | "conv" | "grid" => Ok(Self::Convolution),
            "spectral" | "fft" => Ok(Self::Spectral),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(ParseMethodError(s.to_string())),
        }
    }
}

/// Parameters shared by every strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SumOptions {
    /// Grid spacing for the grid strategies.
    pub delta: f64,
    /// Grouping rule for [`Method::Pairwise`].
    pub aggregation: Aggregation,
    /// Run [`crate::validate`] checks before summing.
    pub validate: bool,
    /// Absolute tolerance used by the validation checks.
    pub tolerance: f64,
}

impl Default for SumOptions {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
            aggregation: Aggregation::Exact,
            validate: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Sum weighted distributions with the chosen strategy.
///
/// Pairwise and convolution have no notion of repetition, so each distribution is
/// listed `repetitions` times for them.
pub fn sum<I>(method: Method, weighted: I, options: &SumOptions) -> Result<Distribution, SumError>
where
    I: IntoIterator<Item = Weighted>,
{
    let weighted: Vec<Weighted> = weighted.into_iter().collect();
    if options.validate {
        validate::check_repetitions(&weighted)?;
        let dists = weighted.iter().map(|w| &w.distribution);
        validate::check_normalized(dists.clone(), options.tolerance)?;
        if method.needs_grid() {
            validate::check_grid(dists, options.delta, options.tolerance)?;
        }
    }
    log::debug!("sum: {} inputs with {method}", weighted.len());

    match method {
        Method::Pairwise => pairwise_sum_with(expand(weighted)?, options.aggregation),
        Method::Convolution => grid_convolution_sum(expand(weighted)?, options.delta),
        Method::Spectral => spectral_sum(weighted, options.delta),
        Method::Hybrid => hybrid_sum(weighted, options.delta),
    }
}

/// List every distribution as many times as its repetition count.
fn expand(weighted: Vec<Weighted>) -> Result<Vec<Distribution>, SumError> {
    validate::check_repetitions(&weighted)?;
    let mut out = Vec::new();
    for w in weighted {
        for _ in 1..w.repetitions {
            out.push(w.distribution.clone());
        }
        out.push(w.distribution);
    }
    Ok(out)
}

/// How far apart two sum distributions are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// Both list the same values (within tolerance) in ascending order.
    pub same_support: bool,
    /// Largest absolute probability difference over the union of supports.
    pub max_abs_difference: f64,
    /// Difference in total probability.
    pub mass_difference: f64,
}

impl Discrepancy {
    /// Same support and every probability within `eps`.
    pub fn agrees(&self, eps: f64) -> bool {
        self.same_support && self.max_abs_difference <= eps
    }
}

/// Compare two distributions value by value. Values within `tolerance` of each
/// other are treated as the same outcome; a value present on only one side counts
/// its whole mass as difference.
pub fn compare(a: &Distribution, b: &Distribution, tolerance: f64) -> Discrepancy {
    let a = a.clone().sorted();
    let b = b.clone().sorted();
    let (mut left, mut right) = (a.pairs().peekable(), b.pairs().peekable());
    let mut same_support = true;
    let mut max_abs_difference: f64 = 0.0;

    loop {
        let diff = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => break,
            (Some((va, pa)), Some((vb, pb))) if (va - vb).abs() <= tolerance => {
                left.next();
                right.next();
                (pa - pb).abs()
            }
            (Some((va, pa)), Some((vb, _))) if va < vb => {
                left.next();
                same_support = false;
                pa.abs()
            }
            (Some((_, pa)), None) => {
                left.next();
                same_support = false;
                pa.abs()
            }
            (_, Some((_, pb))) => {
                right.next();
                same_support = false;
                pb.abs()
            }
        };
        max_abs_difference = max_abs_difference.max(diff);
    }

    Discrepancy {
        same_support,
        max_abs_difference,
        mass_difference: (a.total_probability() - b.total_probability()).abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn die() -> Distribution {
        Distribution::uniform((1..=6).map(f64::from))
    }

    #[test]
    fn test_method_round_trips_through_strings() {
        for method in Method::ALL {
            assert_eq!(method.to_string().parse::<Method>(), Ok(method));
        }
        assert_eq!("FFT".parse::<Method>(), Ok(Method::Spectral));
        assert!("monte-carlo".parse::<Method>().is_err());
    }

    #[test]
    fn test_all_methods_agree_on_three_dice() {
        let options = SumOptions {
            validate: true,
            ..SumOptions::default()
        };
        let reference = sum(Method::Pairwise, [Weighted::new(die(), 3)], &options).unwrap();
        assert_eq!(reference.len(), 16);
        for method in Method::ALL {
            let result = sum(method, [Weighted::new(die(), 3)], &options).unwrap();
            let gap = compare(&reference, &result, 1e-9);
            assert!(gap.agrees(1e-12), "{method}: {gap:?}");
        }
    }

    #[test]
    fn test_expand_rejects_nonpositive_repetitions() {
        let err = sum(
            Method::Pairwise,
            [Weighted::new(die(), 0)],
            &SumOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SumError::InvalidRepetitions {
                index: 0,
                repetitions: 0
            }
        );
    }

    #[test]
    fn test_validation_catches_off_grid_input() {
        let off = Distribution::from_pairs([(0.0, 0.5), (1.5, 0.5)]);
        let options = SumOptions {
            validate: true,
            ..SumOptions::default()
        };
        assert!(matches!(
            sum(Method::Convolution, [Weighted::once(off.clone())], &options),
            Err(SumError::UnevenSpacing { .. })
        ));
        // Pairwise has no grid requirement.
        assert!(sum(Method::Pairwise, [Weighted::once(off)], &options).is_ok());
    }

    #[test]
    fn test_compare_disjoint_supports() {
        let a = Distribution::from_pairs([(0.0, 0.5), (1.0, 0.5)]);
        let b = Distribution::from_pairs([(0.0, 0.5), (2.0, 0.5)]);
        let gap = compare(&a, &b, 1e-9);
        assert!(!gap.same_support);
        assert_eq!(gap.max_abs_difference, 0.5);
        assert_eq!(gap.mass_difference, 0.0);
        assert!(compare(&a, &a, 1e-9).agrees(0.0));
    }
}
