//! Spectral (FFT) combiner.
//!
//! Convolution of PMFs is multiplication of their discrete Fourier transforms, and
//! an r-fold self-convolution is the r-th power of one transform. All inputs are
//! transformed once at the final axis length `L`, exponentiated, multiplied, and
//! brought back with a single inverse transform: O(L log L) regardless of how large
//! the repetition counts are, with memory bounded by `L`.
//!
//! The result carries transform round-off. Probabilities may come out slightly
//! negative or not sum exactly to one.

use rustfft::{FftPlanner, num_complex::Complex};

use crate::distribution::{Distribution, Weighted};
use crate::error::SumError;

/// Largest discarded imaginary component accepted without a warning.
pub const IMAGINARY_RESIDUE_TOLERANCE: f64 = 1e-9;

/// Output of [`spectral_fold`]: the sum and the imaginary part that was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralOutput {
    pub distribution: Distribution,
    /// Largest |imag| over the inverse transform, after normalization.
    pub imaginary_residue: f64,
}

/// PMF of Σ rᵢ·Xᵢ for distributions sharing grid spacing `delta`.
///
/// Logs a warning when the discarded imaginary residue exceeds
/// [`IMAGINARY_RESIDUE_TOLERANCE`].
pub fn spectral_sum<I>(weighted: I, delta: f64) -> Result<Distribution, SumError>
where
    I: IntoIterator<Item = Weighted>,
{
    let weighted: Vec<Weighted> = weighted.into_iter().collect();
    let output = spectral_fold(&weighted, delta)?;
    if output.imaginary_residue > IMAGINARY_RESIDUE_TOLERANCE {
        log::warn!(
            "spectral: discarded imaginary residue {:.3e} exceeds {:.0e}; result may be numerically unstable",
            output.imaginary_residue,
            IMAGINARY_RESIDUE_TOLERANCE
        );
    }
    Ok(output.distribution)
}

/// Spectral sum that also reports the imaginary residue instead of logging it.
pub fn spectral_fold(weighted: &[Weighted], delta: f64) -> Result<SpectralOutput, SumError> {
    if weighted.is_empty() {
        return Err(SumError::EmptyInput);
    }
    if !(delta.is_finite() && delta > 0.0) {
        return Err(SumError::InvalidDelta { delta });
    }

    let mut lo = 0.0;
    let mut hi = 0.0;
    let mut powers = Vec::with_capacity(weighted.len());
    for (index, w) in weighted.iter().enumerate() {
        let power = u32::try_from(w.repetitions)
            .ok()
            .filter(|&r| r >= 1)
            .ok_or(SumError::InvalidRepetitions {
                index,
                repetitions: w.repetitions,
            })?;
        let Some((min, max)) = w.distribution.grid_bounds() else {
            return Err(SumError::EmptyDistribution { index });
        };
        lo += w.repetitions as f64 * min;
        hi += w.repetitions as f64 * max;
        powers.push(power);
    }
    let steps = ((hi - lo) / delta).round();
    if !steps.is_finite() {
        return Err(SumError::InvalidDelta { delta });
    }
    let len = (steps.max(0.0) as usize)
        .checked_add(1)
        .ok_or(SumError::InvalidDelta { delta })?;

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(len);
    let mut product = vec![Complex::new(1.0, 0.0); len];
    for (w, &power) in weighted.iter().zip(&powers) {
        let mut buffer: Vec<Complex<f64>> = w
            .distribution
            .probabilities()
            .iter()
            .take(len)
            .map(|&p| Complex::new(p, 0.0))
            .collect();
        buffer.resize(len, Complex::new(0.0, 0.0));
        forward.process(&mut buffer);

        for (acc, z) in product.iter_mut().zip(&buffer) {
            *acc *= z.powu(power);
        }
    }

    // rustfft leaves the inverse unnormalized.
    let inverse = planner.plan_fft_inverse(len);
    inverse.process(&mut product);
    let scale = 1.0 / len as f64;

    let imaginary_residue = product
        .iter()
        .map(|z| (z.im * scale).abs())
        .fold(0.0, f64::max);
    let probabilities: Vec<f64> = product.iter().map(|z| z.re * scale).collect();
    log::debug!(
        "spectral: {} distributions -> {len} grid points, residue {imaginary_residue:.3e}",
        weighted.len()
    );

    Ok(SpectralOutput {
        distribution: Distribution::on_grid(lo, delta, probabilities),
        imaginary_residue,
    })
}
