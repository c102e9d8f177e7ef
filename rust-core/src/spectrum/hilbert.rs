//! Hilbert transform and envelope detection
//!
//! The transform is a 90° phase shift applied in the frequency domain. The
//! envelope is the magnitude of the analytic signal `x + i·H[x]`.

use num_complex::Complex;
use num_traits::Float;
use serde::{Deserialize, Serialize};

use super::fft::{fft_in_place, to_db};
use crate::error::{CoreError, CoreResult};
use crate::stats::mean;

/// In-place Hilbert transform of a real signal whose length is a power of two
///
/// DC and Nyquist bins are cleared, positive frequencies are multiplied by
/// `-i` and negative frequencies by `+i` (signs swapped for the inverse).
/// `H[cos] = sin`, and the inverse maps `sin` back to `cos`.
pub fn fast_hilbert_transform_power_of2<T: Float>(
    signal: &mut [T],
    forward: bool,
) -> CoreResult<()> {
    let n = signal.len();
    if !n.is_power_of_two() {
        return Err(CoreError::not_power_of_two(n));
    }

    let mut im = vec![T::zero(); n];
    fft_in_place(signal, &mut im, true)?;

    signal[0] = T::zero();
    im[0] = T::zero();
    let nyquist = n / 2;
    if nyquist > 0 {
        signal[nyquist] = T::zero();
        im[nyquist] = T::zero();
    }

    for k in 1..n {
        if k == nyquist {
            continue;
        }
        let (re, imag) = (signal[k], im[k]);
        // (re + i·imag) · (∓i)
        let positive_frequency = k < nyquist;
        if positive_frequency == forward {
            signal[k] = imag;
            im[k] = -re;
        } else {
            signal[k] = -imag;
            im[k] = re;
        }
    }

    fft_in_place(signal, &mut im, false)
}

/// Hilbert transform of an arbitrary-length record
///
/// The record is zero-padded to the next power of two and the result is
/// truncated back to the record length.
pub fn hilbert_transform<T: Float>(record: &[T]) -> CoreResult<Vec<T>> {
    if record.is_empty() {
        return Err(CoreError::InsufficientData { needed: 1, got: 0 });
    }

    let mut padded = vec![T::zero(); record.len().next_power_of_two()];
    padded[..record.len()].copy_from_slice(record);
    fast_hilbert_transform_power_of2(&mut padded, true)?;
    padded.truncate(record.len());

    Ok(padded)
}

/// Analytic signal `x + i·H[x]` of a record
pub fn analytic_signal<T: Float>(record: &[T]) -> CoreResult<Vec<Complex<T>>> {
    let hilbert = hilbert_transform(record)?;
    Ok(record
        .iter()
        .zip(hilbert)
        .map(|(&re, im)| Complex::new(re, im))
        .collect())
}

/// Envelope detector options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Remove the record mean before the transform
    pub subtract_mean: bool,

    /// Report 20*log10 of the envelope instead of the linear magnitude
    pub log_scale: bool,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            subtract_mean: true,
            log_scale: false,
        }
    }
}

/// Envelope of one record
///
/// # Returns
/// `sqrt(x² + H[x]²)` per sample, optionally in dB (reference 1.0)
pub fn envelope<T: Float>(record: &[T], config: &EnvelopeConfig) -> CoreResult<Vec<T>> {
    let mut centered = record.to_vec();
    if config.subtract_mean && !centered.is_empty() {
        let offset = mean(&centered);
        centered.iter_mut().for_each(|x| *x = *x - offset);
    }

    let hilbert = hilbert_transform(&centered)?;
    let magnitude = centered.iter().zip(hilbert).map(|(&x, h)| x.hypot(h));

    Ok(if config.log_scale {
        magnitude.map(|m| to_db(m, T::one())).collect()
    } else {
        magnitude.collect()
    })
}

/// Instantaneous phase (radians) of a record
pub fn instantaneous_phase<T: Float>(record: &[T]) -> CoreResult<Vec<T>> {
    Ok(analytic_signal(record)?.into_iter().map(|z| z.arg()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn wrap_phase(phase: f64) -> f64 {
        let mut p = phase % (2.0 * PI);
        if p > PI {
            p -= 2.0 * PI;
        } else if p <= -PI {
            p += 2.0 * PI;
        }
        p
    }

    fn tone(n: usize, cycles: f64, phase: f64) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * cycles * i as f64 / n as f64 + phase).cos())
            .collect()
    }

    #[test]
    fn test_hilbert_of_cosine_is_sine() {
        let n = 64;
        let mut x = tone(n, 4.0, 0.0);
        fast_hilbert_transform_power_of2(&mut x, true).unwrap();

        for i in 0..n {
            let expected = (2.0 * PI * 4.0 * i as f64 / n as f64).sin();
            assert!((x[i] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_inverse_hilbert_recovers_cosine() {
        let n = 32;
        let original = tone(n, 3.0, 0.0);
        let mut x = tone(n, 3.0, -PI / 2.0); // sine
        fast_hilbert_transform_power_of2(&mut x, false).unwrap();

        for i in 0..n {
            assert!((x[i] - original[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_hilbert_rejects_non_power_of_two() {
        let mut x = vec![0.0f32; 12];
        assert!(fast_hilbert_transform_power_of2(&mut x, true).is_err());
    }

    #[test]
    fn test_envelope_of_tone_is_flat() {
        let x = tone(128, 8.0, 0.3);
        let env = envelope(&x, &EnvelopeConfig::default()).unwrap();
        assert_eq!(env.len(), 128);
        assert!(env.iter().all(|&e| (e - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_envelope_ignores_offset() {
        let x: Vec<f64> = tone(64, 4.0, 0.0).iter().map(|v| 2.0 * v + 10.0).collect();
        let env = envelope(&x, &EnvelopeConfig::default()).unwrap();
        assert!(env.iter().all(|&e| (e - 2.0).abs() < 1e-9));

        let log = envelope(
            &x,
            &EnvelopeConfig {
                subtract_mean: true,
                log_scale: true,
            },
        )
        .unwrap();
        let expected_db = 20.0 * 2.0f64.log10();
        assert!(log.iter().all(|&e| (e - expected_db).abs() < 1e-6));
    }

    #[test]
    fn test_envelope_tracks_pulse() {
        // Gaussian-modulated burst: envelope peaks at the burst center
        let n = 200;
        let x: Vec<f32> = (0..n)
            .map(|i| {
                let t = i as f64 - 120.0;
                ((-t * t / 200.0).exp() * (0.8 * t).cos()) as f32
            })
            .collect();
        let env = envelope(&x, &EnvelopeConfig::default()).unwrap();

        let peak = crate::stats::max_index(&env).unwrap();
        assert!((peak as i64 - 120).abs() <= 2);
        assert!((env[peak] - 1.0).abs() < 0.05);
        assert!(env[20] < 0.05);
    }

    #[test]
    fn test_phase_of_tone_advances() {
        let n = 64;
        let x = tone(n, 4.0, 0.0);
        let phase = instantaneous_phase(&x).unwrap();
        let step = 2.0 * PI * 4.0 / n as f64;
        for i in 1..n {
            let d = wrap_phase(phase[i] - phase[i - 1]);
            assert!((d - step).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_record() {
        assert!(hilbert_transform::<f64>(&[]).is_err());
    }
}
