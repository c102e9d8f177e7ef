//! Radix-2 FFT engine
//!
//! In-place iterative Cooley-Tukey transform over split real/imaginary
//! arrays. The forward transform is unscaled and the inverse divides by `n`,
//! so `inverse(forward(x)) == x`.

use num_traits::Float;
use std::f64::consts::PI;

use crate::error::{CoreError, CoreResult};
use crate::stats::cast;

/// In-place complex FFT over `re[from..to]` / `im[from..to]`.
///
/// # Arguments
/// * `re` - Real parts
/// * `im` - Imaginary parts (same length as `re`)
/// * `from`, `to` - Half-open range to transform; `to - from` must be a power of two
/// * `forward` - Forward (kernel `e^{-2πijk/n}`, unscaled) or inverse (scaled by `1/n`)
pub fn fft_complex_power_of2<T: Float>(
    re: &mut [T],
    im: &mut [T],
    from: usize,
    to: usize,
    forward: bool,
) -> CoreResult<()> {
    if re.len() != im.len() {
        return Err(CoreError::ShapeMismatch {
            len: im.len(),
            record_length: re.len(),
        });
    }
    if from > to || to > re.len() {
        return Err(CoreError::InvalidLength {
            len: to,
            reason: "transform range lies outside the buffer",
        });
    }

    let n = to - from;
    if !n.is_power_of_two() {
        return Err(CoreError::not_power_of_two(n));
    }

    let re = &mut re[from..to];
    let im = &mut im[from..to];

    bit_reverse(re, im);
    butterflies(re, im, forward);

    if !forward {
        let scale = T::one() / cast(n as f64);
        for (r, i) in re.iter_mut().zip(im.iter_mut()) {
            *r = *r * scale;
            *i = *i * scale;
        }
    }

    Ok(())
}

/// Convenience wrapper transforming whole slices.
pub fn fft_in_place<T: Float>(re: &mut [T], im: &mut [T], forward: bool) -> CoreResult<()> {
    let n = re.len();
    fft_complex_power_of2(re, im, 0, n, forward)
}

fn bit_reverse<T: Float>(re: &mut [T], im: &mut [T]) {
    let n = re.len();
    let mut j = 0usize;

    for i in 0..n {
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
        let mut m = n >> 1;
        while m >= 1 && j >= m {
            j -= m;
            m >>= 1;
        }
        j += m;
    }
}

fn butterflies<T: Float>(re: &mut [T], im: &mut [T], forward: bool) {
    let n = re.len();
    let sign = if forward { -1.0 } else { 1.0 };
    let mut half = 1usize;

    while half < n {
        let step = half << 1;
        let theta = sign * PI / half as f64;

        // Twiddle recurrence: w <- w * e^{i theta}, no trig per butterfly
        let wtemp = (0.5 * theta).sin();
        let wpr = cast::<T>(-2.0 * wtemp * wtemp);
        let wpi = cast::<T>(theta.sin());
        let mut wr = T::one();
        let mut wi = T::zero();

        for m in 0..half {
            let mut i = m;
            while i < n {
                let j = i + half;
                let tr = wr * re[j] - wi * im[j];
                let ti = wr * im[j] + wi * re[j];
                re[j] = re[i] - tr;
                im[j] = im[i] - ti;
                re[i] = re[i] + tr;
                im[i] = im[i] + ti;
                i += step;
            }
            let previous = wr;
            wr = wr * wpr - wi * wpi + wr;
            wi = wi * wpr + previous * wpi + wi;
        }

        half = step;
    }
}

/// FFT engine for real-valued records
///
/// Owns zero-padded scratch buffers for one batch call. Not shared between calls.
pub struct FftEngine<T> {
    /// FFT size (power of two)
    fft_size: usize,

    /// Reusable real-part buffer
    re: Vec<T>,

    /// Reusable imaginary-part buffer
    im: Vec<T>,
}

impl<T: Float> FftEngine<T> {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size, must be a power of two
    pub fn new(fft_size: usize) -> CoreResult<Self> {
        if !fft_size.is_power_of_two() {
            return Err(CoreError::not_power_of_two(fft_size));
        }

        Ok(Self {
            fft_size,
            re: vec![T::zero(); fft_size],
            im: vec![T::zero(); fft_size],
        })
    }

    /// Engine sized for records of `record_length` samples (next power of two)
    pub fn for_record_length(record_length: usize) -> CoreResult<Self> {
        Self::new(record_length.max(1).next_power_of_two())
    }

    /// Forward transform of a zero-padded real signal, returning the raw bins
    ///
    /// The returned slices stay valid until the next call.
    pub fn transform(&mut self, signal: &[T]) -> CoreResult<(&[T], &[T])> {
        let copy_len = signal.len().min(self.fft_size);
        self.re[..copy_len].copy_from_slice(&signal[..copy_len]);
        self.re[copy_len..].fill(T::zero());
        self.im.fill(T::zero());

        fft_in_place(&mut self.re, &mut self.im, true)?;

        Ok((&self.re, &self.im))
    }

    /// Compute FFT and return magnitude spectrum
    ///
    /// # Returns
    /// Magnitude |X[k]| for k = 0..=fft_size/2 (positive frequencies only)
    pub fn compute_magnitude(&mut self, signal: &[T]) -> CoreResult<Vec<T>> {
        let bins = self.num_bins();
        let (re, im) = self.transform(signal)?;
        Ok(re[..bins]
            .iter()
            .zip(im[..bins].iter())
            .map(|(&r, &i)| r.hypot(i))
            .collect())
    }

    /// Number of non-negative frequency bins (fft_size/2 + 1)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Frequency of a bin for sampling interval `dt`
    pub fn bin_to_frequency(&self, bin: usize, dt: f64) -> f64 {
        bin as f64 / (self.fft_size as f64 * dt)
    }
}

/// Amplitude to decibels, clamping at 1e-10 to avoid log(0)
pub fn to_db<T: Float>(magnitude: T, reference: T) -> T {
    let clamped = magnitude.max(cast(1e-10));
    cast::<T>(20.0) * (clamped / reference).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::{num_complex::Complex, FftPlanner};

    fn pseudo_random(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                ((state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
            })
            .collect()
    }

    #[test]
    fn test_round_trip() {
        for &n in &[1usize, 2, 4, 16, 256] {
            let re0 = pseudo_random(n, 7);
            let im0 = pseudo_random(n, 11);
            let mut re = re0.clone();
            let mut im = im0.clone();

            fft_in_place(&mut re, &mut im, true).unwrap();
            fft_in_place(&mut re, &mut im, false).unwrap();

            for k in 0..n {
                assert!((re[k] - re0[k]).abs() < 1e-12, "n={} k={}", n, k);
                assert!((im[k] - im0[k]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_parseval() {
        let n = 128;
        let mut re = pseudo_random(n, 3);
        let mut im = pseudo_random(n, 5);
        let time_energy: f64 = re.iter().zip(&im).map(|(r, i)| r * r + i * i).sum();

        fft_in_place(&mut re, &mut im, true).unwrap();
        let freq_energy: f64 = re.iter().zip(&im).map(|(r, i)| r * r + i * i).sum();

        assert!((time_energy - freq_energy / n as f64).abs() < 1e-9);
    }

    #[test]
    fn test_matches_rustfft() {
        let n = 64;
        let re0 = pseudo_random(n, 17);
        let im0 = pseudo_random(n, 19);

        let mut expected: Vec<Complex<f64>> = re0
            .iter()
            .zip(&im0)
            .map(|(&r, &i)| Complex::new(r, i))
            .collect();
        FftPlanner::new().plan_fft_forward(n).process(&mut expected);

        let mut re = re0.clone();
        let mut im = im0.clone();
        fft_in_place(&mut re, &mut im, true).unwrap();

        for k in 0..n {
            assert!((re[k] - expected[k].re).abs() < 1e-10);
            assert!((im[k] - expected[k].im).abs() < 1e-10);
        }
    }

    #[test]
    fn test_sub_range_only() {
        let mut re = vec![9.0, 1.0, 1.0, 1.0, 1.0, 9.0];
        let mut im = vec![0.0; 6];
        fft_complex_power_of2(&mut re, &mut im, 1, 5, true).unwrap();

        // DC of four ones, other bins empty, outside untouched
        assert_eq!(re[0], 9.0);
        assert_eq!(re[5], 9.0);
        assert!((re[1] - 4.0).abs() < 1e-12);
        for k in 2..5 {
            assert!(re[k].abs() < 1e-12 && im[k].abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_bad_lengths() {
        let mut re = vec![0.0f32; 6];
        let mut im = vec![0.0f32; 6];
        assert_eq!(
            fft_in_place(&mut re, &mut im, true),
            Err(CoreError::not_power_of_two(6))
        );

        let mut short = vec![0.0f32; 4];
        assert!(fft_in_place(&mut re[..4], &mut short[..2], true).is_err());
        assert!(fft_complex_power_of2(&mut re, &mut im, 4, 8, true).is_err());
    }

    #[test]
    fn test_engine_dc_signal() {
        let mut fft = FftEngine::<f64>::new(1024).unwrap();

        // DC signal (constant), zero-padded
        let signal = vec![1.0; 100];
        let spectrum = fft.compute_magnitude(&signal).unwrap();

        assert_eq!(spectrum.len(), 513);
        assert!((spectrum[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_engine_sine_peak() {
        let n = 256;
        let dt = 1e-3;
        let mut fft = FftEngine::<f32>::for_record_length(n).unwrap();

        // 62.5 Hz lands exactly on bin 16
        let signal: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * 62.5 * i as f64 * dt).sin() as f32)
            .collect();
        let spectrum = fft.compute_magnitude(&signal).unwrap();

        let peak = crate::stats::max_index(&spectrum).unwrap();
        assert_eq!(peak, 16);
        assert!((fft.bin_to_frequency(peak, dt) - 62.5).abs() < 1e-9);
        assert!((spectrum[peak] - 128.0).abs() < 0.1);
    }

    #[test]
    fn test_db_clamps_zero() {
        assert!((to_db(0.0f64, 1.0) + 200.0).abs() < 1e-9);
        assert!((to_db(10.0f64, 1.0) - 20.0).abs() < 1e-12);
    }
}
