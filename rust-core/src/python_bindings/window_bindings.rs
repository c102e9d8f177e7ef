//! Python bindings for window generation

use numpy::PyArray1;
use pyo3::prelude::*;

use crate::filters::{WindowSpec, WindowType};

/// Window type enum exposed to Python
#[pyclass(name = "WindowType")]
#[derive(Clone, Copy)]
pub enum PyWindowType {
    Blackman,
    BlackmanHarris,
    BlackmanNuttall,
    Bohman,
    CosineTapered,
    ExactBlackman,
    Exponential,
    FlatTop,
    Gaussian,
    Hamming,
    Hann,
    Kaiser,
    ModifiedBartlettHann,
    Parzen,
    Rectangular,
    Triangle,
    Welch,
}

impl From<PyWindowType> for WindowType {
    fn from(py_win: PyWindowType) -> Self {
        match py_win {
            PyWindowType::Blackman => WindowType::Blackman,
            PyWindowType::BlackmanHarris => WindowType::BlackmanHarris,
            PyWindowType::BlackmanNuttall => WindowType::BlackmanNuttall,
            PyWindowType::Bohman => WindowType::Bohman,
            PyWindowType::CosineTapered => WindowType::CosineTapered,
            PyWindowType::ExactBlackman => WindowType::ExactBlackman,
            PyWindowType::Exponential => WindowType::Exponential,
            PyWindowType::FlatTop => WindowType::FlatTop,
            PyWindowType::Gaussian => WindowType::Gaussian,
            PyWindowType::Hamming => WindowType::Hamming,
            PyWindowType::Hann => WindowType::Hann,
            PyWindowType::Kaiser => WindowType::Kaiser,
            PyWindowType::ModifiedBartlettHann => WindowType::ModifiedBartlettHann,
            PyWindowType::Parzen => WindowType::Parzen,
            PyWindowType::Rectangular => WindowType::Rectangular,
            PyWindowType::Triangle => WindowType::Triangle,
            PyWindowType::Welch => WindowType::Welch,
        }
    }
}

/// Window table of `window_type` with its parameter
pub(crate) fn window_spec(window_type: PyWindowType, param: f64) -> WindowSpec {
    WindowSpec::new(window_type.into(), param)
}

/// Generate a two-sided window
///
/// Args:
///     window_type: Window family
///     length: Number of samples
///     param: Secondary parameter (tapered, exponential, Gaussian, Kaiser)
///     normalize: Scale so the weights sum to one
///
/// Returns:
///     Window weights as numpy array; all zero for an out-of-range parameter
#[pyfunction]
#[pyo3(signature = (window_type, length, param=0.0, normalize=false))]
pub fn generate_window<'py>(
    py: Python<'py>,
    window_type: PyWindowType,
    length: usize,
    param: f64,
    normalize: bool,
) -> &'py PyArray1<f64> {
    PyArray1::from_vec(py, window_spec(window_type, param).generate(length, normalize))
}

/// Generate the non-negative half of a symmetric window
///
/// Args:
///     window_type: Window family
///     radius: Largest lag; the table has `radius + 1` entries
///     param: Secondary parameter
///     normalize: Scale so the equivalent two-sided window sums to one
#[pyfunction]
#[pyo3(signature = (window_type, radius, param=0.0, normalize=false))]
pub fn generate_window_single_sided<'py>(
    py: Python<'py>,
    window_type: PyWindowType,
    radius: usize,
    param: f64,
    normalize: bool,
) -> &'py PyArray1<f64> {
    PyArray1::from_vec(py, window_spec(window_type, param).generate_single_sided(radius, normalize))
}
