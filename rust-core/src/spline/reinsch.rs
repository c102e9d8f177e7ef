//! Reinsch smoothing spline
//!
//! Minimizes `∫ S''(x)² dx` subject to `Σ ((S(x_i) - y_i) / σ)² ≤ s` with
//! `s = λ·n`. The constraint is enforced through a Lagrange multiplier `p`
//! found by a Newton-type outer iteration; every step solves a pentadiagonal
//! system by forward elimination and back substitution. With `λ = 0` the fit
//! interpolates the data and the result is the natural cubic spline.

use crate::error::{CoreError, CoreResult};

/// Outer-iteration cap for the multiplier search
pub const MAX_ITERATIONS: usize = 256;

/// Piecewise cubic `a + h·(b + h·(c + h·d))` over strictly increasing knots
///
/// `h` is the offset from the left knot of the interval. Outside the knot
/// range the first or last interval's polynomial extrapolates.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingSpline {
    x: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
    multiplier: f64,
    iterations: usize,
}

impl SmoothingSpline {
    /// Natural cubic spline through the points (zero second derivative at both ends)
    pub fn natural(x: &[f64], y: &[f64]) -> CoreResult<Self> {
        Self::fit(x, y, 1.0, 0.0)
    }

    /// Fit a smoothing spline
    ///
    /// # Arguments
    /// * `x` - Knot abscissas, strictly increasing, at least two
    /// * `y` - Ordinates
    /// * `sigma` - Noise standard deviation of the ordinates (≥ 0)
    /// * `lambda` - Smoothing factor (≥ 0); the target is `s = lambda * n`
    ///
    /// # Errors
    /// Shape and parameter errors, or `NumericDegenerate` when an elimination
    /// pivot is not positive.
    pub fn fit(x: &[f64], y: &[f64], sigma: f64, lambda: f64) -> CoreResult<Self> {
        Self::fit_with_limit(x, y, sigma, lambda, MAX_ITERATIONS)
    }

    /// [`fit`](Self::fit) with an explicit outer-iteration cap (at least one pass runs)
    pub(crate) fn fit_with_limit(
        x: &[f64],
        y: &[f64],
        sigma: f64,
        lambda: f64,
        max_iterations: usize,
    ) -> CoreResult<Self> {
        if x.len() != y.len() {
            return Err(CoreError::ShapeMismatch {
                len: y.len(),
                record_length: x.len(),
            });
        }
        if x.len() < 2 {
            return Err(CoreError::InsufficientData {
                needed: 2,
                got: x.len(),
            });
        }
        if !(sigma >= 0.0 && sigma.is_finite()) {
            return Err(CoreError::InvalidParameter(format!(
                "standard deviation must be finite and non-negative, got {}",
                sigma
            )));
        }
        if !(lambda >= 0.0 && lambda.is_finite()) {
            return Err(CoreError::InvalidParameter(format!(
                "smoothing factor must be finite and non-negative, got {}",
                lambda
            )));
        }
        if let Some(pair) = x.windows(2).find(|pair| !(pair[1] > pair[0])) {
            return Err(CoreError::InvalidParameter(format!(
                "knots must be strictly increasing ({} then {})",
                pair[0], pair[1]
            )));
        }

        let target = lambda * x.len() as f64;
        solve(x, y, sigma, target, max_iterations)
    }

    /// Number of knots
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Knot abscissas
    pub fn knots(&self) -> &[f64] {
        &self.x
    }

    /// Coefficient arrays `(a, b, c, d)`, one entry per knot
    pub fn coefficients(&self) -> (&[f64], &[f64], &[f64], &[f64]) {
        (&self.a, &self.b, &self.c, &self.d)
    }

    /// Final Lagrange multiplier (zero for an interpolating spline)
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Outer iterations used by the fit
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Interval whose polynomial covers `t`
    fn interval(&self, t: f64) -> usize {
        let last = self.x.len() - 2;
        self.x.partition_point(|&xi| xi <= t).saturating_sub(1).min(last)
    }

    /// Spline value at `t`
    pub fn evaluate(&self, t: f64) -> f64 {
        let i = self.interval(t);
        let h = t - self.x[i];
        self.a[i] + h * (self.b[i] + h * (self.c[i] + h * self.d[i]))
    }

    /// First derivative at `t`
    pub fn derivative(&self, t: f64) -> f64 {
        let i = self.interval(t);
        let h = t - self.x[i];
        self.b[i] + h * (2.0 * self.c[i] + 3.0 * h * self.d[i])
    }

    /// Second derivative at `t`
    pub fn second_derivative(&self, t: f64) -> f64 {
        let i = self.interval(t);
        let h = t - self.x[i];
        2.0 * self.c[i] + 6.0 * h * self.d[i]
    }

    /// Per-interval polynomial `(a, b, c, d, width)` for interval `i`
    pub(crate) fn piece(&self, i: usize) -> (f64, f64, f64, f64, f64) {
        (
            self.a[i],
            self.b[i],
            self.c[i],
            self.d[i],
            self.x[i + 1] - self.x[i],
        )
    }
}

/// Reinsch's procedure on 1-based work arrays padded by one slot on each side
fn solve(
    xs: &[f64],
    ys: &[f64],
    dy: f64,
    s: f64,
    max_iterations: usize,
) -> CoreResult<SmoothingSpline> {
    let n = xs.len();
    let x = |i: usize| xs[i - 1];
    let y = |i: usize| ys[i - 1];

    let size = n + 2;
    let mut r = vec![0.0; size];
    let mut r1 = vec![0.0; size];
    let mut r2 = vec![0.0; size];
    let mut t = vec![0.0; size];
    let mut t1 = vec![0.0; size];
    let mut u = vec![0.0; size];
    let mut v = vec![0.0; size];
    let mut a = vec![0.0; size];
    let mut b = vec![0.0; size];
    let mut c = vec![0.0; size];
    let mut d = vec![0.0; size];

    let (n1, n2) = (1, n);
    let (m1, m2) = (n1 + 1, n2 - 1);

    // Second divided differences and the band of the penalty matrix
    let mut h = x(m1) - x(n1);
    let mut f = (y(m1) - y(n1)) / h;
    for i in m1..=m2 {
        let g = h;
        h = x(i + 1) - x(i);
        let e = f;
        f = (y(i + 1) - y(i)) / h;
        a[i] = f - e;
        t[i] = 2.0 * (g + h) / 3.0;
        t1[i] = h / 3.0;
        r2[i] = dy / g;
        r[i] = dy / h;
        r1[i] = -dy / g - dy / h;
    }
    for i in m1..=m2 {
        b[i] = r[i] * r[i] + r1[i] * r1[i] + r2[i] * r2[i];
        c[i] = r[i] * r1[i + 1] + r1[i] * r2[i + 1];
        d[i] = r[i] * r2[i + 2];
    }

    let mut p = 0.0;
    let mut f2 = -s;
    let mut iterations = 0;

    loop {
        iterations += 1;

        // Forward elimination
        let (mut f, mut g, mut h) = (0.0, 0.0, 0.0);
        for i in m1..=m2 {
            r1[i - 1] = f * r[i - 1];
            r2[i - 2] = g * r[i - 2];
            let pivot = p * b[i] + t[i] - f * r1[i - 1] - g * r2[i - 2];
            if !(pivot > 0.0 && pivot.is_finite()) {
                return Err(CoreError::NumericDegenerate(format!(
                    "non-positive pivot {} at knot {} (multiplier {})",
                    pivot, i, p
                )));
            }
            r[i] = 1.0 / pivot;
            u[i] = a[i] - r1[i - 1] * u[i - 1] - r2[i - 2] * u[i - 2];
            f = p * c[i] + t1[i] - h * r1[i - 1];
            g = h;
            h = d[i] * p;
        }

        // Back substitution
        for i in (m1..=m2).rev() {
            u[i] = r[i] * u[i] - r1[i] * u[i + 1] - r2[i] * u[i + 2];
        }

        // Residuals v and the realized smoothing e·p²
        let mut e = 0.0;
        h = 0.0;
        for i in n1..=m2 {
            g = h;
            h = (u[i + 1] - u[i]) / (x(i + 1) - x(i));
            v[i] = (h - g) * dy * dy;
            e += v[i] * (h - g);
        }
        g = -h * dy * dy;
        v[n2] = g;
        e -= g * h;

        let previous = f2;
        f2 = e * p * p;
        if f2 >= s || f2 <= previous {
            break;
        }
        if iterations >= max_iterations {
            // f2 increases monotonically towards s, so the latest iterate is the closest
            tracing::warn!(
                iterations,
                multiplier = p,
                realized = f2,
                target = s,
                "smoothing spline did not reach its target; using latest iterate"
            );
            break;
        }

        // Newton step on the multiplier
        f = 0.0;
        h = (v[m1] - v[n1]) / (x(m1) - x(n1));
        for i in m1..=m2 {
            g = h;
            h = (v[i + 1] - v[i]) / (x(i + 1) - x(i));
            g = h - g - r1[i - 1] * r[i - 1] - r2[i - 2] * r[i - 2];
            f += g * r[i] * g;
            r[i] = g;
        }
        h = e - p * f;
        if h <= 0.0 {
            break;
        }
        p += (s - f2) / (((s / e).sqrt() + p) * h);
    }

    tracing::debug!(knots = n, iterations, multiplier = p, "smoothing spline fitted");

    for i in n1..=n2 {
        a[i] = y(i) - p * v[i];
        c[i] = u[i];
    }
    for i in n1..=m2 {
        let h = x(i + 1) - x(i);
        d[i] = (c[i + 1] - c[i]) / (3.0 * h);
        b[i] = (a[i + 1] - a[i]) / h - (h * d[i] + c[i]) * h;
    }

    // Slope at the last knot so every coefficient row is meaningful
    let h = x(n2) - x(m2);
    b[n2] = b[m2] + h * (2.0 * c[m2] + 3.0 * h * d[m2]);
    d[n2] = 0.0;

    Ok(SmoothingSpline {
        x: xs.to_vec(),
        a: a[n1..=n2].to_vec(),
        b: b[n1..=n2].to_vec(),
        c: c[n1..=n2].to_vec(),
        d: d[n1..=n2].to_vec(),
        multiplier: p,
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_data_reproduced_exactly() {
        let x = [0.0, 1.0, 2.5, 4.0, 7.0];
        let y: Vec<f64> = x.iter().map(|&v| 3.0 - 2.0 * v).collect();
        let spline = SmoothingSpline::natural(&x, &y).unwrap();

        for k in 0..=70 {
            let t = k as f64 * 0.1;
            assert!((spline.evaluate(t) - (3.0 - 2.0 * t)).abs() < 1e-12);
            assert!((spline.derivative(t) + 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cubic_reproduced_in_interior() {
        let p = |x: f64| 0.01 * x.powi(3) - 0.2 * x * x + x;
        let x: Vec<f64> = (0..=20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| p(v)).collect();
        let spline = SmoothingSpline::natural(&x, &y).unwrap();

        // Interpolates every knot
        for (&xi, &yi) in x.iter().zip(&y) {
            assert!((spline.evaluate(xi) - yi).abs() < 1e-12);
        }
        // Natural end effects decay geometrically away from the ends
        for k in 0..=40 {
            let t = 8.0 + k as f64 * 0.1;
            assert!((spline.evaluate(t) - p(t)).abs() < 1e-4, "t = {}", t);
        }
    }

    #[test]
    fn test_natural_end_conditions() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 0.0, 1.0];
        let spline = SmoothingSpline::natural(&x, &y).unwrap();

        assert!(spline.second_derivative(0.0).abs() < 1e-12);
        assert!(spline.second_derivative(3.0).abs() < 1e-12);
        assert_eq!(spline.multiplier(), 0.0);
        assert_eq!(spline.iterations(), 1);
    }

    #[test]
    fn test_continuity_at_knots() {
        let x = [0.0, 0.5, 2.0, 2.2, 5.0];
        let y = [1.0, -1.0, 2.0, 0.5, 3.0];
        let spline = SmoothingSpline::natural(&x, &y).unwrap();

        for &k in &x[1..4] {
            let eps = 1e-9;
            assert!((spline.evaluate(k - eps) - spline.evaluate(k + eps)).abs() < 1e-6);
            assert!((spline.derivative(k - eps) - spline.derivative(k + eps)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_two_knots_is_a_line() {
        let spline = SmoothingSpline::natural(&[1.0, 3.0], &[2.0, 6.0]).unwrap();
        assert!((spline.evaluate(2.0) - 4.0).abs() < 1e-12);
        // Linear extrapolation beyond both ends
        assert!((spline.evaluate(0.0) - 0.0).abs() < 1e-12);
        assert!((spline.evaluate(5.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_smoothing_reduces_roughness() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let noise = [0.3, -0.2, 0.25, -0.35, 0.1, -0.15, 0.3, -0.05, 0.2, -0.3];
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &v)| (v / 8.0).sin() + noise[i % noise.len()])
            .collect();

        let interpolating = SmoothingSpline::natural(&x, &y).unwrap();
        let smooth = SmoothingSpline::fit(&x, &y, 0.25, 1.0).unwrap();

        let roughness = |s: &SmoothingSpline| -> f64 {
            x.iter().map(|&t| s.second_derivative(t).powi(2)).sum()
        };
        assert!(smooth.multiplier() > 0.0);
        assert!(roughness(&smooth) < 0.1 * roughness(&interpolating));

        // Residuals are about the noise level, not zero
        let rms = (x
            .iter()
            .zip(&y)
            .map(|(&t, &v)| (smooth.evaluate(t) - v).powi(2))
            .sum::<f64>()
            / x.len() as f64)
            .sqrt();
        assert!(rms > 0.05 && rms < 0.4, "rms = {}", rms);
    }

    #[test]
    fn test_zero_sigma_interpolates() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 2.0, -1.0, 1.0];
        let spline = SmoothingSpline::fit(&x, &y, 0.0, 1.0).unwrap();
        for (&xi, &yi) in x.iter().zip(&y) {
            assert!((spline.evaluate(xi) - yi).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            SmoothingSpline::natural(&[1.0], &[1.0]),
            Err(CoreError::InsufficientData { needed: 2, got: 1 })
        ));
        assert!(matches!(
            SmoothingSpline::natural(&[0.0, 1.0], &[1.0]),
            Err(CoreError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            SmoothingSpline::natural(&[0.0, 1.0, 1.0], &[1.0, 2.0, 3.0]),
            Err(CoreError::InvalidParameter(_))
        ));
        assert!(SmoothingSpline::fit(&[0.0, 1.0], &[0.0, 1.0], -1.0, 0.0).is_err());
        assert!(SmoothingSpline::fit(&[0.0, 1.0], &[0.0, 1.0], 1.0, f64::NAN).is_err());
    }

    fn noisy_sine() -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let y = x
            .iter()
            .map(|&v| (v / 6.0).sin() + if v as usize % 2 == 0 { 0.2 } else { -0.2 })
            .collect();
        (x, y)
    }

    #[test]
    fn test_iteration_cap_keeps_latest_iterate() {
        let (x, y) = noisy_sine();

        // One pass stops before any Newton step: the interpolant
        let first = SmoothingSpline::fit_with_limit(&x, &y, 0.2, 1.0, 1).unwrap();
        assert_eq!(first.iterations(), 1);
        assert_eq!(first.multiplier(), 0.0);
        for (&xi, &yi) in x.iter().zip(&y) {
            assert!((first.evaluate(xi) - yi).abs() < 1e-9);
        }

        let second = SmoothingSpline::fit_with_limit(&x, &y, 0.2, 1.0, 2).unwrap();
        assert_eq!(second.iterations(), 2);
        assert!(second.multiplier() > 0.0);
        assert!(x.iter().all(|&t| second.evaluate(t).is_finite()));

        let full = SmoothingSpline::fit(&x, &y, 0.2, 1.0).unwrap();
        assert!(full.iterations() < MAX_ITERATIONS);
    }

    #[test]
    fn test_non_finite_pivot_is_degenerate() {
        // Interval widths sum past f64::MAX in the band
        let result = SmoothingSpline::natural(&[-1e308, 0.0, 1e308], &[0.0, 0.0, 0.0]);
        assert!(matches!(result, Err(CoreError::NumericDegenerate(_))));

        // A NaN ordinate poisons the multiplier and then the pivots
        let result = SmoothingSpline::natural(&[0.0, 1.0, 2.0, 3.0], &[0.0, f64::NAN, 1.0, 2.0]);
        assert!(matches!(result, Err(CoreError::NumericDegenerate(_))));
    }
}
