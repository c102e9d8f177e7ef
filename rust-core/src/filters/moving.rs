//! Centered moving-window operations on a single record
//!
//! Windows are truncated at the record ends; the weighted average renormalizes
//! over the weights that remain inside the record.

use num_traits::Float;

use super::windows::WindowSpec;
use crate::stats::{cast, to_f64};

/// Whether the record changes sign between two consecutive samples
///
/// Zero counts as positive, so touching zero from above is not a crossing.
#[inline]
pub fn is_zero_crossing<T: Float>(a: T, b: T) -> bool {
    (a < T::zero()) != (b < T::zero())
}

/// Number of sign changes in a record
pub fn count_zero_crossings<T: Float>(samples: &[T]) -> usize {
    samples
        .windows(2)
        .filter(|pair| is_zero_crossing(pair[0], pair[1]))
        .count()
}

/// Weighted moving average with a symmetric window of `2 * radius + 1` taps
///
/// # Arguments
/// * `samples` - One record
/// * `window` - Window family; its single-sided half weights the lags
/// * `radius` - Half-width in samples
///
/// # Returns
/// Smoothed record of the same length. Positions whose weights sum to zero
/// (a window with an out-of-range parameter) come out as zero.
pub fn moving_average<T: Float>(samples: &[T], window: &WindowSpec, radius: usize) -> Vec<T> {
    let weights = window.generate_single_sided(radius, false);
    let n = samples.len();

    (0..n)
        .map(|i| {
            let mut acc = 0.0;
            let mut norm = 0.0;

            // Lag 0 once, then each remaining lag on both sides
            let center = to_f64(samples[i]);
            acc += weights[0] * center;
            norm += weights[0];

            for (k, &w) in weights.iter().enumerate().skip(1) {
                if k <= i {
                    acc += w * to_f64(samples[i - k]);
                    norm += w;
                }
                if i + k < n {
                    acc += w * to_f64(samples[i + k]);
                    norm += w;
                }
            }

            if norm > 0.0 {
                cast(acc / norm)
            } else {
                T::zero()
            }
        })
        .collect()
}

/// Number of zero crossings inside a centered window at every sample
///
/// A crossing between samples `j` and `j + 1` is counted at position `i` when
/// both samples lie within `[i - radius, i + radius]`.
pub fn moving_zero_crossing_count<T: Float>(samples: &[T], radius: usize) -> Vec<usize> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    // prefix[j] = crossings between samples (0,1) .. (j-1,j)
    let mut prefix = Vec::with_capacity(n);
    prefix.push(0usize);
    for j in 1..n {
        let step = usize::from(is_zero_crossing(samples[j - 1], samples[j]));
        prefix.push(prefix[j - 1] + step);
    }

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius).min(n - 1);
            prefix[hi] - prefix[lo]
        })
        .collect()
}
