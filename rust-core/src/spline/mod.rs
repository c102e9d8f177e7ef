//! Cubic splines: Reinsch smoothing spline, natural interpolation, root finding

pub mod reinsch;
pub mod roots;

pub use reinsch::SmoothingSpline;
pub use roots::{cubic_roots, spline_zero_crossings};
