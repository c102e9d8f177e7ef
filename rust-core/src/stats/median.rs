//! Sort-based median and the sentinel-aware median filter

use std::cmp::Ordering;

use num_traits::Float;

use super::cast;

/// Median of a run; the mean of the two middle values for even lengths.
///
/// Returns `None` for an empty slice. The input is left untouched.
pub fn median<T: Float>(samples: &[T]) -> Option<T> {
    let mut scratch = samples.to_vec();
    median_and_sort(&mut scratch)
}

/// Median of a run, sorting the run in place as a side effect.
pub fn median_and_sort<T: Float>(samples: &mut [T]) -> Option<T> {
    let n = samples.len();
    if n == 0 {
        return None;
    }

    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = n / 2;
    if n % 2 == 1 {
        Some(samples[mid])
    } else {
        Some((samples[mid - 1] + samples[mid]) / cast(2.0))
    }
}

/// Running median over a window of `2 * radius + 1` samples.
///
/// Entries equal to `ignore` do not take part in any window. The window is
/// truncated at both ends. When every entry of a window is ignored, the output
/// at that position is `ignore` as well.
pub fn median_filter_ignoring<T: Float>(values: &[T], radius: usize, ignore: T) -> Vec<T> {
    let n = values.len();
    let mut window = Vec::with_capacity(2 * radius + 1);

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius + 1).min(n);

            window.clear();
            window.extend(values[lo..hi].iter().copied().filter(|&v| v != ignore));

            median_and_sort(&mut window).unwrap_or(ignore)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median::<f64>(&[]), None);
    }

    #[test]
    fn test_median_and_sort_sorts() {
        let mut a = [5.0f32, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(median_and_sort(&mut a), Some(3.0));
        assert_eq!(a, [1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_median_leaves_input() {
        let a = [5.0, 1.0, 4.0];
        let _ = median(&a);
        assert_eq!(a, [5.0, 1.0, 4.0]);
    }

    #[test]
    fn test_filter_ignores_sentinel() {
        let gates = [-1.0, 3.0, -1.0, 7.0, -1.0];
        let filtered = median_filter_ignoring(&gates, 1, -1.0);
        assert_eq!(filtered, vec![3.0, 3.0, 5.0, 7.0, 7.0]);
    }

    #[test]
    fn test_filter_propagates_all_ignored() {
        let gates = [-1.0, -1.0, -1.0, 4.0];
        let filtered = median_filter_ignoring(&gates, 1, -1.0);
        assert_eq!(filtered, vec![-1.0, -1.0, 4.0, 4.0]);
    }

    #[test]
    fn test_filter_removes_outlier() {
        let values = [10.0, 10.0, 50.0, 10.0, 10.0];
        let filtered = median_filter_ignoring(&values, 1, f64::NAN);
        assert_eq!(filtered, vec![10.0; 5]);
    }

    #[test]
    fn test_filter_radius_zero_is_identity() {
        let values = [1.0, -1.0, 3.0];
        assert_eq!(median_filter_ignoring(&values, 0, -1.0), vec![1.0, -1.0, 3.0]);
    }
}
