//! Elementwise helpers, extremum search and finite differences

use num_traits::Float;

use super::cast;

/// Add `value` to every sample in place.
pub fn add_scalar<T: Float>(samples: &mut [T], value: T) {
    for s in samples.iter_mut() {
        *s = *s + value;
    }
}

/// Multiply every sample by `value` in place.
pub fn multiply_scalar<T: Float>(samples: &mut [T], value: T) {
    for s in samples.iter_mut() {
        *s = *s * value;
    }
}

/// Index of the largest sample (first occurrence on ties).
///
/// Returns `None` for an empty slice. NaN samples never win.
pub fn max_index<T: Float>(samples: &[T]) -> Option<usize> {
    extremum_index(samples, |candidate, best| candidate > best)
}

/// Index of the smallest sample (first occurrence on ties).
pub fn min_index<T: Float>(samples: &[T]) -> Option<usize> {
    extremum_index(samples, |candidate, best| candidate < best)
}

fn extremum_index<T, F>(samples: &[T], better: F) -> Option<usize>
where
    T: Float,
    F: Fn(T, T) -> bool,
{
    let mut iter = samples.iter().enumerate();
    let (mut best_idx, mut best) = iter.next().map(|(i, &v)| (i, v))?;

    for (i, &v) in iter {
        // A leading NaN would otherwise block every comparison
        if better(v, best) || (best.is_nan() && !v.is_nan()) {
            best = v;
            best_idx = i;
        }
    }

    Some(best_idx)
}

/// Derivative by finite differences with sample spacing `dx`.
///
/// Centered difference at interior points, forward difference at the first
/// sample and backward difference at the last one. A single sample has a
/// derivative of zero.
pub fn simple_derivative<T: Float>(samples: &[T], dx: T) -> Vec<T> {
    let n = samples.len();
    match n {
        0 => Vec::new(),
        1 => vec![T::zero()],
        2 => {
            let d = (samples[1] - samples[0]) / dx;
            vec![d, d]
        }
        _ => {
            let two_dx = cast::<T>(2.0) * dx;
            let mut out = Vec::with_capacity(n);
            out.push((samples[1] - samples[0]) / dx);
            for i in 1..n - 1 {
                out.push((samples[i + 1] - samples[i - 1]) / two_dx);
            }
            out.push((samples[n - 1] - samples[n - 2]) / dx);
            out
        }
    }
}
