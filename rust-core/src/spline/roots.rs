//! Real roots of cubics and of piecewise-cubic splines

use std::f64::consts::PI;

use super::reinsch::SmoothingSpline;
use crate::error::CoreResult;

/// Relative size below which a leading coefficient is treated as zero
const DEGENERATE: f64 = 1e-12;

/// Real roots of `a + b·h + c·h² + d·h³`, ascending
///
/// Degrades to the quadratic or linear case when the leading coefficients
/// vanish. A polynomial that is identically zero has no isolated roots and
/// yields an empty list. Tangential (even-multiplicity) roots of a cubic may
/// be reported once or not at all.
pub fn cubic_roots(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    let scale = a.abs() + b.abs() + c.abs();
    if d == 0.0 || d.abs() <= DEGENERATE * scale {
        return quadratic_roots(a, b, c);
    }

    // Monic form x³ + p x² + q x + r, then the depressed cubic via Q and R
    let (p, q, r) = (c / d, b / d, a / d);
    let big_q = (p * p - 3.0 * q) / 9.0;
    let big_r = (2.0 * p * p * p - 9.0 * p * q + 27.0 * r) / 54.0;
    let shift = p / 3.0;

    let q3 = big_q * big_q * big_q;
    let mut roots = if big_r * big_r < q3 {
        let theta = (big_r / q3.sqrt()).clamp(-1.0, 1.0).acos();
        let m = -2.0 * big_q.sqrt();
        vec![
            m * (theta / 3.0).cos() - shift,
            m * ((theta + 2.0 * PI) / 3.0).cos() - shift,
            m * ((theta - 2.0 * PI) / 3.0).cos() - shift,
        ]
    } else {
        let s = -big_r.signum() * (big_r.abs() + (big_r * big_r - q3).sqrt()).cbrt();
        let t = if s != 0.0 { big_q / s } else { 0.0 };
        vec![s + t - shift]
    };

    for root in roots.iter_mut() {
        *root = polish(*root, a, b, c, d);
    }
    roots.sort_by(f64::total_cmp);
    roots
}

fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    let scale = a.abs() + b.abs();
    if c == 0.0 || c.abs() <= DEGENERATE * scale {
        return if b != 0.0 { vec![-a / b] } else { Vec::new() };
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    if disc == 0.0 {
        return vec![-b / (2.0 * c)];
    }

    // Stable form avoids cancellation in -b ± sqrt(disc); |q| ≥ sqrt(disc) / 2 > 0
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    let mut roots = vec![q / c, a / q];
    roots.sort_by(f64::total_cmp);
    roots
}

/// Two Newton steps, kept only when they reduce the residual
fn polish(mut x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    let value = |x: f64| a + x * (b + x * (c + x * d));
    for _ in 0..2 {
        let slope = b + x * (2.0 * c + 3.0 * x * d);
        if slope == 0.0 {
            break;
        }
        let next = x - value(x) / slope;
        if next.is_finite() && value(next).abs() <= value(x).abs() {
            x = next;
        } else {
            break;
        }
    }
    x
}

impl SmoothingSpline {
    /// Abscissas in `[x_first, x_last]` where the spline is zero, ascending
    ///
    /// Each interval is searched as `[x_i, x_{i+1})` with the last one closed,
    /// so a root on a knot is reported once.
    pub fn roots(&self) -> Vec<f64> {
        let knots = self.knots();
        let intervals = knots.len() - 1;
        let span = knots[intervals] - knots[0];
        let tolerance = 1e-9 * span;

        let mut roots: Vec<f64> = Vec::new();
        for i in 0..intervals {
            let (a, b, c, d, width) = self.piece(i);
            let last = i + 1 == intervals;
            for h in cubic_roots(a, b, c, d) {
                let inside = h >= -tolerance
                    && (h < width - tolerance || (last && h <= width + tolerance));
                if !inside {
                    continue;
                }
                let x = knots[i] + h.clamp(0.0, width);
                if roots.last().map_or(true, |&prev| x - prev > tolerance) {
                    roots.push(x);
                }
            }
        }
        roots
    }
}

/// Sub-sample zero crossings of uniformly sampled data
///
/// Fits a natural spline through `(i·dt, samples[i])` and returns its roots.
pub fn spline_zero_crossings(samples: &[f64], dt: f64) -> CoreResult<Vec<f64>> {
    let x: Vec<f64> = (0..samples.len()).map(|i| i as f64 * dt).collect();
    Ok(SmoothingSpline::natural(&x, samples)?.roots())
}
