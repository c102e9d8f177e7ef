//! Python bindings for per-record batch operations
//!
//! Every function takes a flat float64 buffer and its record length.

use numpy::{PyArray1, PyArray2, PyReadonlyArray1};
use pyo3::prelude::*;

use super::window_bindings::{window_spec, PyWindowType};
use crate::records;
use crate::spectrum::{EnvelopeConfig, SpectrumConfig};

/// Envelope of every record
///
/// Args:
///     samples: Flat buffer of whole records
///     record_length: Samples per record
///     subtract_mean: Remove each record's mean first
///     log_scale: Return 20*log10 of the envelope
#[pyfunction]
#[pyo3(signature = (samples, record_length, subtract_mean=true, log_scale=false))]
pub fn envelope<'py>(
    py: Python<'py>,
    samples: PyReadonlyArray1<f64>,
    record_length: usize,
    subtract_mean: bool,
    log_scale: bool,
) -> PyResult<&'py PyArray1<f64>> {
    let config = EnvelopeConfig {
        subtract_mean,
        log_scale,
    };
    let out = records::envelope(samples.as_slice()?, record_length, &config)?;
    Ok(PyArray1::from_vec(py, out))
}

/// Variance of every record
#[pyfunction]
#[pyo3(signature = (samples, record_length, unbiased=true))]
pub fn variance_per_record<'py>(
    py: Python<'py>,
    samples: PyReadonlyArray1<f64>,
    record_length: usize,
    unbiased: bool,
) -> PyResult<&'py PyArray1<f64>> {
    let out = records::variance_per_record(samples.as_slice()?, record_length, unbiased)?;
    Ok(PyArray1::from_vec(py, out))
}

/// Skewness of every record (NaN for constant records)
#[pyfunction]
#[pyo3(signature = (samples, record_length, sample=true))]
pub fn skewness_per_record<'py>(
    py: Python<'py>,
    samples: PyReadonlyArray1<f64>,
    record_length: usize,
    sample: bool,
) -> PyResult<&'py PyArray1<f64>> {
    let out = records::skewness_per_record(samples.as_slice()?, record_length, sample)?;
    Ok(PyArray1::from_vec(py, out))
}

/// Number of sign changes in every record
#[pyfunction]
pub fn zero_crossing_count(
    samples: PyReadonlyArray1<f64>,
    record_length: usize,
) -> PyResult<Vec<usize>> {
    Ok(records::zero_crossing_count_per_record(samples.as_slice()?, record_length)?)
}

/// Sub-sample zero crossing positions of every record
///
/// Returns:
///     One list of positions (in units of dt) per record
#[pyfunction]
#[pyo3(signature = (samples, record_length, dt=1.0))]
pub fn zero_crossing_positions(
    samples: PyReadonlyArray1<f64>,
    record_length: usize,
    dt: f64,
) -> PyResult<Vec<Vec<f64>>> {
    Ok(records::zero_crossing_positions(samples.as_slice()?, record_length, dt)?)
}

/// Frequency of the strongest non-DC bin of every record
///
/// Args:
///     samples: Flat buffer of whole records
///     record_length: Samples per record
///     dt: Sampling interval
///     window_type: Optional window applied before the transform
///     param: Window parameter
///     subtract_mean: Remove each record's mean first
#[pyfunction]
#[pyo3(signature = (samples, record_length, dt, window_type=None, param=0.0, subtract_mean=true))]
pub fn spectral_max_frequency(
    samples: PyReadonlyArray1<f64>,
    record_length: usize,
    dt: f64,
    window_type: Option<PyWindowType>,
    param: f64,
    subtract_mean: bool,
) -> PyResult<Vec<Option<f64>>> {
    let config = SpectrumConfig {
        window: window_type.map(|w| window_spec(w, param)),
        subtract_mean,
        ..SpectrumConfig::default()
    };
    Ok(records::spectral_max_frequency(samples.as_slice()?, record_length, dt, config)?)
}

/// Amplitude spectrum of every record as a (records, bins) array
#[pyfunction]
#[pyo3(signature = (samples, record_length, db=false, window_type=None, param=0.0))]
pub fn amplitude_spectrum<'py>(
    py: Python<'py>,
    samples: PyReadonlyArray1<f64>,
    record_length: usize,
    db: bool,
    window_type: Option<PyWindowType>,
    param: f64,
) -> PyResult<&'py PyArray2<f64>> {
    let config = SpectrumConfig {
        window: window_type.map(|w| window_spec(w, param)),
        ..SpectrumConfig::default()
    };
    let spectra =
        records::amplitude_spectrum_per_record(samples.as_slice()?, record_length, config, db)?;
    Ok(PyArray2::from_owned_array(py, spectra))
}

/// Window-weighted moving average of every record
#[pyfunction]
#[pyo3(signature = (
    samples,
    record_length,
    radius,
    window_type=PyWindowType::Rectangular,
    param=0.0
))]
pub fn moving_average<'py>(
    py: Python<'py>,
    samples: PyReadonlyArray1<f64>,
    record_length: usize,
    radius: usize,
    window_type: PyWindowType,
    param: f64,
) -> PyResult<&'py PyArray1<f64>> {
    let mut out = samples.as_slice()?.to_vec();
    let window = window_spec(window_type, param);
    records::moving_average_in_place(&mut out, record_length, &window, radius)?;
    Ok(PyArray1::from_vec(py, out))
}

/// Smoothing spline of every record evaluated at its samples
///
/// Args:
///     sigma: Noise standard deviation
///     lam: Smoothing factor (0 reproduces the input)
#[pyfunction]
pub fn smooth_records<'py>(
    py: Python<'py>,
    samples: PyReadonlyArray1<f64>,
    record_length: usize,
    sigma: f64,
    lam: f64,
) -> PyResult<&'py PyArray1<f64>> {
    let out = records::smooth_records(samples.as_slice()?, record_length, sigma, lam)?;
    Ok(PyArray1::from_vec(py, out))
}
