//! Array primitives and streaming statistics
//!
//! Every routine is generic over the sample width (`f32` / `f64`).

pub mod arrays;
pub mod moments;
pub mod median;

pub use arrays::{add_scalar, max_index, min_index, multiply_scalar, simple_derivative};
pub use median::{median, median_and_sort, median_filter_ignoring};
pub use moments::{mean, mean_and_variance, skewness, MeanVariance};

use num_traits::Float;

/// Convert an `f64` constant into the sample type.
///
/// Lossless for `f64`, rounds for `f32`.
#[inline]
pub(crate) fn cast<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

/// Widen a sample to `f64` for the spline and gate stages.
#[inline]
pub(crate) fn to_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
