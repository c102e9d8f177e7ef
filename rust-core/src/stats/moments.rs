//! Single-pass moment estimators
//!
//! Welford's update for mean and variance and Terriberry's extension for the
//! third central moment. Both avoid the catastrophic cancellation of the
//! textbook sum-of-squares formulas on records with a large DC offset.

use num_traits::Float;

use super::cast;
use crate::error::{CoreError, CoreResult};

/// Mean and variance of a sample run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanVariance<T> {
    pub mean: T,
    pub variance: T,
}

/// Arithmetic mean.
///
/// An empty slice yields NaN; callers pass the sub-range `&a[from..to]`.
pub fn mean<T: Float>(samples: &[T]) -> T {
    let sum = samples.iter().fold(T::zero(), |acc, &x| acc + x);
    sum / cast(samples.len() as f64)
}

/// Mean and variance in one pass (Welford).
///
/// # Arguments
/// * `samples` - Sample run
/// * `unbiased` - Normalize by `n - 1` instead of `n`
///
/// # Errors
/// `NumericDegenerate` for an empty run, or for a single sample when the
/// unbiased estimate is requested.
pub fn mean_and_variance<T: Float>(samples: &[T], unbiased: bool) -> CoreResult<MeanVariance<T>> {
    let n = samples.len();
    if n == 0 || (unbiased && n < 2) {
        return Err(CoreError::NumericDegenerate(format!(
            "variance of {} sample(s) (unbiased: {})",
            n, unbiased
        )));
    }

    let mut mean = T::zero();
    let mut m2 = T::zero();
    let mut count = T::zero();

    for &x in samples {
        count = count + T::one();
        let delta = x - mean;
        mean = mean + delta / count;
        m2 = m2 + delta * (x - mean);
    }

    let denominator = if unbiased { count - T::one() } else { count };

    Ok(MeanVariance {
        mean,
        variance: m2 / denominator,
    })
}

/// Skewness in one pass (Terriberry).
///
/// # Arguments
/// * `samples` - Sample run (at least three samples)
/// * `sample_skewness` - Apply the finite-population correction `sqrt(n(n-1))/(n-2)`
///
/// # Errors
/// `InsufficientData` below three samples, `NumericDegenerate` when all samples
/// are equal (zero spread).
pub fn skewness<T: Float>(samples: &[T], sample_skewness: bool) -> CoreResult<T> {
    let n = samples.len();
    if n < 3 {
        return Err(CoreError::InsufficientData { needed: 3, got: n });
    }

    let two = cast::<T>(2.0);
    let three = cast::<T>(3.0);

    let mut mean = T::zero();
    let mut m2 = T::zero();
    let mut m3 = T::zero();
    let mut count = T::zero();

    for &x in samples {
        let previous = count;
        count = count + T::one();
        let delta = x - mean;
        let delta_over_n = delta / count;
        let term = delta * delta_over_n * previous;
        mean = mean + delta_over_n;
        m3 = m3 + term * delta_over_n * (count - two) - three * delta_over_n * m2;
        m2 = m2 + term;
    }

    if m2 <= T::zero() {
        return Err(CoreError::NumericDegenerate(
            "skewness of a constant run".to_string(),
        ));
    }

    let g1 = count.sqrt() * m3 / m2.powf(cast(1.5));
    if sample_skewness {
        Ok(g1 * (count * (count - T::one())).sqrt() / (count - two))
    } else {
        Ok(g1)
    }
}
