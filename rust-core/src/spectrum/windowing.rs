//! Window application for spectra and gates

use num_traits::Float;

use crate::filters::windows::WindowSpec;
use crate::stats::cast;

/// Multiply a signal by a precomputed weight table
///
/// Samples beyond the table length are left unchanged.
pub fn apply_weights_inplace<T: Float>(signal: &mut [T], weights: &[f64]) {
    for (s, &w) in signal.iter_mut().zip(weights.iter()) {
        *s = *s * cast(w);
    }
}

/// Apply window to signal
///
/// # Returns
/// Windowed copy; the input is untouched
pub fn apply_window<T: Float>(signal: &[T], window: &WindowSpec) -> Vec<T> {
    let mut out = signal.to_vec();
    apply_window_inplace(&mut out, window);
    out
}

/// Apply window in-place
pub fn apply_window_inplace<T: Float>(signal: &mut [T], window: &WindowSpec) {
    let weights = window.generate(signal.len(), false);
    apply_weights_inplace(signal, &weights);
}

/// Extract a fixed-length segment starting at `start`
///
/// # Arguments
/// * `signal` - One record
/// * `start` - First sample of the segment
/// * `length` - Segment length; the part beyond the record is zero-filled
/// * `weights` - Optional weight table of `length` entries
pub fn extract_segment<T: Float>(
    signal: &[T],
    start: usize,
    length: usize,
    weights: Option<&[f64]>,
) -> Vec<T> {
    let mut segment = vec![T::zero(); length];

    if start < signal.len() {
        let end = (start + length).min(signal.len());
        segment[..end - start].copy_from_slice(&signal[start..end]);
    }

    if let Some(weights) = weights {
        apply_weights_inplace(&mut segment, weights);
    }

    segment
}

/// Calculate window amplitude correction factor
///
/// Multiplying a windowed spectrum by this factor restores the amplitude of
/// a bin-centered tone. Zero windows give a factor of one.
pub fn window_correction_factor(window: &WindowSpec, length: usize) -> f64 {
    let weights = window.generate(length, false);
    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        length as f64 / sum
    } else {
        1.0
    }
}
