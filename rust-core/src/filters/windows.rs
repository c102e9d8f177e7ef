//! Window functions for gating, moving averages and spectral analysis
//!
//! Every family is a shape `g(u)` on `u ∈ [-1, 1]` with `g(0) = 1`.
//! A two-sided window of length `n` samples `w[i] = g(2i/n - 1)`: the first
//! sample sits on the rising edge, `w[n/2]` is the peak, and the last sample is
//! nonzero. A single-sided window of radius `r` samples `s[k] = g(k/(r+1))`
//! for the non-negative lags only.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    /// 0.42 + 0.5cos(πu) + 0.08cos(2πu)
    Blackman,

    /// Four-term Blackman-Harris, ~92 dB sidelobes
    BlackmanHarris,

    /// Four-term Blackman-Nuttall
    BlackmanNuttall,

    /// (1-|u|)cos(π|u|) + sin(π|u|)/π
    Bohman,

    /// Tukey window. Parameter: tapered fraction of the half-width, `[0, 1]`
    CosineTapered,

    /// Blackman with the exact coefficients 7938/18608, 9240/18608, 1430/18608
    ExactBlackman,

    /// f^|u|. Parameter: value at the edge, `(0, 1]`
    Exponential,

    /// Five-term flat top, for amplitude-accurate spectra
    FlatTop,

    /// exp(-½(u/σ)²). Parameter: σ relative to the half-width, `(0, 0.5]`
    Gaussian,

    /// 0.54 + 0.46cos(πu)
    Hamming,

    /// Hanning: 0.5 + 0.5cos(πu)
    Hann,

    /// I0(β√(1-u²))/I0(β). Parameter: β, `[0, ∞)`
    Kaiser,

    /// Modified Bartlett-Hanning: 0.62 - 0.24|u| + 0.38cos(πu)
    ModifiedBartlettHann,

    /// Piecewise cubic de la Vallée Poussin window
    Parzen,

    /// Rectangular window (no weighting)
    Rectangular,

    /// Bartlett: 1 - |u|
    Triangle,

    /// 1 - u²
    Welch,
}

impl WindowType {
    /// All supported families
    pub const ALL: [WindowType; 17] = [
        WindowType::Blackman,
        WindowType::BlackmanHarris,
        WindowType::BlackmanNuttall,
        WindowType::Bohman,
        WindowType::CosineTapered,
        WindowType::ExactBlackman,
        WindowType::Exponential,
        WindowType::FlatTop,
        WindowType::Gaussian,
        WindowType::Hamming,
        WindowType::Hann,
        WindowType::Kaiser,
        WindowType::ModifiedBartlettHann,
        WindowType::Parzen,
        WindowType::Rectangular,
        WindowType::Triangle,
        WindowType::Welch,
    ];

    /// Whether `param` lies in the family's valid range
    ///
    /// Families without a parameter accept anything.
    pub fn accepts(&self, param: f64) -> bool {
        match self {
            WindowType::CosineTapered => (0.0..=1.0).contains(&param),
            WindowType::Exponential => param > 0.0 && param <= 1.0,
            WindowType::Gaussian => param > 0.0 && param <= 0.5,
            WindowType::Kaiser => param >= 0.0 && param.is_finite(),
            _ => true,
        }
    }

    /// Shape value at normalized position `u ∈ [-1, 1]`
    ///
    /// `i0_beta` is `I0(param)`, precomputed for Kaiser windows.
    fn shape(&self, u: f64, param: f64, i0_beta: f64) -> f64 {
        let a = u.abs();
        match self {
            WindowType::Blackman => cosine_sum(&[0.42, 0.5, 0.08], u),
            WindowType::BlackmanHarris => cosine_sum(&[0.35875, 0.48829, 0.14128, 0.01168], u),
            WindowType::BlackmanNuttall => {
                cosine_sum(&[0.3635819, 0.4891775, 0.1365995, 0.0106411], u)
            }
            WindowType::Bohman => (1.0 - a) * (PI * a).cos() + (PI * a).sin() / PI,
            WindowType::CosineTapered => {
                let flat = 1.0 - param;
                if a <= flat {
                    1.0
                } else {
                    0.5 * (1.0 + (PI * (a - flat) / param).cos())
                }
            }
            WindowType::ExactBlackman => cosine_sum(
                &[7938.0 / 18608.0, 9240.0 / 18608.0, 1430.0 / 18608.0],
                u,
            ),
            WindowType::Exponential => param.powf(a),
            WindowType::FlatTop => cosine_sum(
                &[0.21557895, 0.41663158, 0.277263158, 0.083578947, 0.006947368],
                u,
            ),
            WindowType::Gaussian => (-0.5 * (u / param).powi(2)).exp(),
            WindowType::Hamming => 0.54 + 0.46 * (PI * u).cos(),
            WindowType::Hann => 0.5 + 0.5 * (PI * u).cos(),
            WindowType::Kaiser => bessel_i0(param * (1.0 - u * u).max(0.0).sqrt()) / i0_beta,
            WindowType::ModifiedBartlettHann => 0.62 - 0.24 * a + 0.38 * (PI * u).cos(),
            WindowType::Parzen => {
                if a <= 0.5 {
                    1.0 - 6.0 * a * a * (1.0 - a)
                } else {
                    2.0 * (1.0 - a).powi(3)
                }
            }
            WindowType::Rectangular => 1.0,
            WindowType::Triangle => 1.0 - a,
            WindowType::Welch => 1.0 - u * u,
        }
    }
}

/// Σ a_k cos(kπu), rescaled so the peak is exactly one
fn cosine_sum(coefficients: &[f64], u: f64) -> f64 {
    let total: f64 = coefficients.iter().sum();
    let value: f64 = coefficients
        .iter()
        .enumerate()
        .map(|(k, &a)| a * (k as f64 * PI * u).cos())
        .sum();
    value / total
}

/// Zeroth-order modified Bessel function of the first kind, I0(x)
///
/// Abramowitz & Stegun 9.8.1 below |x| = 3.75 and 9.8.2 above.
pub fn bessel_i0(x: f64) -> f64 {
    let ax = x.abs();

    if ax < 3.75 {
        let t = (x / 3.75).powi(2);
        1.0 + t
            * (3.5156229
                + t * (3.0899424
                    + t * (1.2067492 + t * (0.2659732 + t * (0.0360768 + t * 0.0045813)))))
    } else {
        let t = 3.75 / ax;
        (ax.exp() / ax.sqrt())
            * (0.39894228
                + t * (0.01328592
                    + t * (0.00225319
                        + t * (-0.00157565
                            + t * (0.00916281
                                + t * (-0.02057706
                                    + t * (0.02635537 + t * (-0.01647633 + t * 0.00392377))))))))
    }
}

/// Generate a two-sided window
///
/// # Arguments
/// * `window_type` - Window family
/// * `length` - Number of samples
/// * `param` - Secondary parameter (ignored by families without one)
/// * `normalize` - Scale the weights to sum to one
///
/// # Returns
/// `length` weights; all zero when `param` is outside the family's range
pub fn generate_window(
    window_type: WindowType,
    length: usize,
    param: f64,
    normalize: bool,
) -> Vec<f64> {
    if !window_type.accepts(param) {
        return vec![0.0; length];
    }
    if length == 1 {
        return vec![1.0];
    }

    let i0_beta = kaiser_denominator(window_type, param);
    let n = length as f64;
    let mut window: Vec<f64> = (0..length)
        .map(|i| window_type.shape(2.0 * i as f64 / n - 1.0, param, i0_beta))
        .collect();

    if normalize {
        let sum: f64 = window.iter().sum();
        if sum > 0.0 {
            window.iter_mut().for_each(|w| *w /= sum);
        }
    }

    window
}

/// Generate the non-negative-lag half of a centered window
///
/// Index 0 is the peak (1.0 unnormalized); index `k` weights the samples at
/// lag `±k`. With `normalize`, the equivalent two-sided window of length
/// `2 * radius + 1` sums to one.
pub fn generate_window_single_sided(
    window_type: WindowType,
    radius: usize,
    param: f64,
    normalize: bool,
) -> Vec<f64> {
    if !window_type.accepts(param) {
        return vec![0.0; radius + 1];
    }

    let i0_beta = kaiser_denominator(window_type, param);
    let half_width = (radius + 1) as f64;
    let mut window: Vec<f64> = (0..=radius)
        .map(|k| window_type.shape(k as f64 / half_width, param, i0_beta))
        .collect();

    if normalize {
        let sum = window[0] + 2.0 * window[1..].iter().sum::<f64>();
        if sum > 0.0 {
            window.iter_mut().for_each(|w| *w /= sum);
        }
    }

    window
}

fn kaiser_denominator(window_type: WindowType, param: f64) -> f64 {
    if window_type == WindowType::Kaiser {
        bessel_i0(param)
    } else {
        1.0
    }
}

/// A window family together with its parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSpec {
    /// Window family
    pub window_type: WindowType,

    /// Secondary parameter for tapered, exponential, Gaussian and Kaiser windows
    pub param: f64,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            window_type: WindowType::Hann,
            param: 0.0,
        }
    }
}

impl WindowSpec {
    pub fn new(window_type: WindowType, param: f64) -> Self {
        Self { window_type, param }
    }

    /// Two-sided weights of `length` samples
    pub fn generate(&self, length: usize, normalize: bool) -> Vec<f64> {
        generate_window(self.window_type, length, self.param, normalize)
    }

    /// Single-sided weights for lags `0..=radius`
    pub fn generate_single_sided(&self, radius: usize, normalize: bool) -> Vec<f64> {
        generate_window_single_sided(self.window_type, radius, self.param, normalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_param(window_type: WindowType) -> f64 {
        match window_type {
            WindowType::CosineTapered => 0.5,
            WindowType::Exponential => 0.1,
            WindowType::Gaussian => 0.4,
            WindowType::Kaiser => 6.0,
            _ => 0.0,
        }
    }

    #[test]
    fn test_peak_is_one() {
        for &window_type in WindowType::ALL.iter() {
            let w = generate_window(window_type, 64, default_param(window_type), false);
            assert_eq!(w.len(), 64);
            assert!(
                (w[32] - 1.0).abs() < 1e-12,
                "{:?} peak = {}",
                window_type,
                w[32]
            );
            assert!(w.iter().all(|&v| v <= 1.0 + 1e-12), "{:?}", window_type);
        }
    }

    #[test]
    fn test_symmetric_about_peak() {
        for &window_type in WindowType::ALL.iter() {
            let w = generate_window(window_type, 32, default_param(window_type), false);
            for k in 1..16 {
                assert!((w[16 - k] - w[16 + k]).abs() < 1e-12, "{:?}", window_type);
            }
        }
    }

    #[test]
    fn test_last_sample_nonzero() {
        let hann = generate_window(WindowType::Hann, 16, 0.0, false);
        assert!(hann[0].abs() < 1e-12);
        assert!(hann[15] > 0.0);

        let triangle = generate_window(WindowType::Triangle, 4, 0.0, false);
        assert_eq!(triangle, vec![0.0, 0.5, 1.0, 0.5]);
    }

    #[test]
    fn test_normalized_sums_to_one() {
        for &window_type in WindowType::ALL.iter() {
            let w = generate_window(window_type, 101, default_param(window_type), true);
            let sum: f64 = w.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "{:?} sum = {}", window_type, sum);
        }
    }

    #[test]
    fn test_single_sided() {
        for &window_type in WindowType::ALL.iter() {
            let s = generate_window_single_sided(window_type, 5, default_param(window_type), false);
            assert_eq!(s.len(), 6);
            assert_eq!(s[0], 1.0, "{:?}", window_type);
        }

        let s = generate_window_single_sided(WindowType::Hann, 7, 0.0, true);
        let equivalent = s[0] + 2.0 * s[1..].iter().sum::<f64>();
        assert!((equivalent - 1.0).abs() < 1e-12);
        assert!(s.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_single_sided_matches_two_sided_shape() {
        // Radius r covers the same shape as a two-sided window of 2(r+1) samples
        let r = 7;
        let s = generate_window_single_sided(WindowType::Hamming, r, 0.0, false);
        let w = generate_window(WindowType::Hamming, 2 * (r + 1), 0.0, false);
        for k in 0..=r {
            assert!((s[k] - w[r + 1 + k]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_out_of_range_param_gives_zeros() {
        let cases = [
            (WindowType::CosineTapered, 1.5),
            (WindowType::CosineTapered, -0.1),
            (WindowType::Exponential, 0.0),
            (WindowType::Exponential, 2.0),
            (WindowType::Gaussian, 0.0),
            (WindowType::Gaussian, 0.6),
            (WindowType::Kaiser, -1.0),
            (WindowType::Kaiser, f64::NAN),
        ];
        for &(window_type, param) in cases.iter() {
            assert!(generate_window(window_type, 16, param, true).iter().all(|&w| w == 0.0));
            assert!(generate_window_single_sided(window_type, 4, param, false)
                .iter()
                .all(|&w| w == 0.0));
        }
    }

    #[test]
    fn test_parameter_limits() {
        let rect = generate_window(WindowType::Rectangular, 8, f64::NAN, false);
        assert!(rect.iter().all(|&w| w == 1.0));

        // Zero taper and beta = 0 both collapse to the rectangle
        assert_eq!(generate_window(WindowType::CosineTapered, 8, 0.0, false), rect);
        let kaiser = generate_window(WindowType::Kaiser, 8, 0.0, false);
        assert!(kaiser.iter().all(|&w| (w - 1.0).abs() < 1e-12));

        let exponential = generate_window(WindowType::Exponential, 8, 0.25, false);
        assert!((exponential[0] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(generate_window(WindowType::Hann, 0, 0.0, false).is_empty());
        assert_eq!(generate_window(WindowType::Hann, 1, 0.0, true), vec![1.0]);
        assert_eq!(generate_window_single_sided(WindowType::Hann, 0, 0.0, true), vec![1.0]);
    }

    #[test]
    fn test_bessel_i0() {
        // Reference values from tables
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-12);
        assert!((bessel_i0(1.0) - 1.2660658777).abs() < 1e-6);
        assert!((bessel_i0(-1.0) - 1.2660658777).abs() < 1e-6);
        assert!((bessel_i0(5.0) - 27.239871823).abs() / 27.239871823 < 1e-6);
    }

    #[test]
    fn test_spec_defaults() {
        let spec = WindowSpec::default();
        assert_eq!(spec.window_type, WindowType::Hann);
        assert_eq!(spec.generate(10, false).len(), 10);
    }
}
