//! PyO3 bindings for Python integration

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::CoreError;

mod gate_bindings;
mod record_bindings;
mod window_bindings;

impl From<CoreError> for PyErr {
    fn from(err: CoreError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// Python module definition
#[pymodule]
fn waveform_workbench(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<window_bindings::PyWindowType>()?;
    m.add_class::<gate_bindings::PyGateDetector>()?;
    m.add_class::<gate_bindings::PyGatePipeline>()?;

    m.add_function(wrap_pyfunction!(window_bindings::generate_window, m)?)?;
    m.add_function(wrap_pyfunction!(window_bindings::generate_window_single_sided, m)?)?;

    m.add_function(wrap_pyfunction!(record_bindings::envelope, m)?)?;
    m.add_function(wrap_pyfunction!(record_bindings::variance_per_record, m)?)?;
    m.add_function(wrap_pyfunction!(record_bindings::skewness_per_record, m)?)?;
    m.add_function(wrap_pyfunction!(record_bindings::zero_crossing_count, m)?)?;
    m.add_function(wrap_pyfunction!(record_bindings::zero_crossing_positions, m)?)?;
    m.add_function(wrap_pyfunction!(record_bindings::spectral_max_frequency, m)?)?;
    m.add_function(wrap_pyfunction!(record_bindings::amplitude_spectrum, m)?)?;
    m.add_function(wrap_pyfunction!(record_bindings::moving_average, m)?)?;
    m.add_function(wrap_pyfunction!(record_bindings::smooth_records, m)?)?;

    Ok(())
}
