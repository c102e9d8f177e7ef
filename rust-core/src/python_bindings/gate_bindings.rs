//! Python bindings for the gate pipeline

use numpy::{PyArray1, PyArray2, PyReadonlyArray1};
use pyo3::prelude::*;

use super::window_bindings::{window_spec, PyWindowType};
use crate::gate::{FillStrategy, GateConfig, GateDetector, GatePipeline};

/// Gate detector enum exposed to Python
#[pyclass(name = "GateDetector")]
#[derive(Clone, Copy)]
pub enum PyGateDetector {
    PositiveThreshold,
    NegativeThreshold,
    Maximum,
    Minimum,
}

impl From<PyGateDetector> for GateDetector {
    fn from(py_det: PyGateDetector) -> Self {
        match py_det {
            PyGateDetector::PositiveThreshold => GateDetector::PositiveThreshold,
            PyGateDetector::NegativeThreshold => GateDetector::NegativeThreshold,
            PyGateDetector::Maximum => GateDetector::Maximum,
            PyGateDetector::Minimum => GateDetector::Minimum,
        }
    }
}

/// Gate pipeline exposed to Python
#[pyclass(name = "GatePipeline")]
pub struct PyGatePipeline {
    pipeline: GatePipeline,
}

#[pymethods]
impl PyGatePipeline {
    /// Create a new gate pipeline
    ///
    /// Args:
    ///     detector: Feature marking the gate
    ///     threshold: Detection threshold
    ///     search_start: First sample searched in every record
    ///     median_radius: Median filter radius over records (0 disables)
    ///     gate_length: Samples per gate
    ///     offset: Shift from detected position to gate start
    ///     records_per_frame: Use 2-D nearest-neighbor fill on this grid width
    ///         instead of the spline fill
    ///     window_type: Optional weighting of extracted gates
    ///     param: Window parameter
    #[new]
    #[pyo3(signature = (
        detector=PyGateDetector::PositiveThreshold,
        threshold=0.0,
        search_start=0,
        median_radius=2,
        gate_length=64,
        offset=0,
        records_per_frame=None,
        window_type=None,
        param=0.0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        detector: PyGateDetector,
        threshold: f64,
        search_start: usize,
        median_radius: usize,
        gate_length: usize,
        offset: isize,
        records_per_frame: Option<usize>,
        window_type: Option<PyWindowType>,
        param: f64,
    ) -> PyResult<Self> {
        let config = GateConfig {
            detector: detector.into(),
            threshold,
            search_start,
            median_radius,
            fill: match records_per_frame {
                Some(records_per_frame) => FillStrategy::NearestNeighbor2d { records_per_frame },
                None => FillStrategy::Spline,
            },
            gate_length,
            offset,
            window: window_type.map(|w| window_spec(w, param)),
        };

        Ok(Self {
            pipeline: GatePipeline::new(config)?,
        })
    }

    /// Run detection, median filtering and gap fill
    ///
    /// Returns:
    ///     Tuple of (detected, filtered, filled) lists with None for missing gates
    #[allow(clippy::type_complexity)]
    fn run(
        &self,
        samples: PyReadonlyArray1<f64>,
        record_length: usize,
    ) -> PyResult<(Vec<Option<usize>>, Vec<Option<usize>>, Vec<Option<usize>>)> {
        let track = self.pipeline.run(samples.as_slice()?, record_length)?;
        Ok((track.detected, track.filtered, track.filled))
    }

    /// Gate outline as a list of (sample, record) vertices
    fn outline(
        &self,
        samples: PyReadonlyArray1<f64>,
        record_length: usize,
    ) -> PyResult<Vec<(usize, usize)>> {
        let track = self.pipeline.run(samples.as_slice()?, record_length)?;
        Ok(self.pipeline.outline(&track, record_length))
    }

    /// Gated samples as a (records, gate_length) array
    fn extract<'py>(
        &self,
        py: Python<'py>,
        samples: PyReadonlyArray1<f64>,
        record_length: usize,
    ) -> PyResult<&'py PyArray2<f64>> {
        let samples = samples.as_slice()?;
        let track = self.pipeline.run(samples, record_length)?;
        let gates = self.pipeline.extract(samples, record_length, &track)?;
        Ok(PyArray2::from_owned_array(py, gates))
    }

    /// Buffer copy with samples outside the gates zeroed
    fn gated_waveform<'py>(
        &self,
        py: Python<'py>,
        samples: PyReadonlyArray1<f64>,
        record_length: usize,
    ) -> PyResult<&'py PyArray1<f64>> {
        let samples = samples.as_slice()?;
        let track = self.pipeline.run(samples, record_length)?;
        let out = self.pipeline.gated_waveform(samples, record_length, &track)?;
        Ok(PyArray1::from_vec(py, out))
    }

    /// Get gate length
    fn gate_length(&self) -> usize {
        self.pipeline.config().gate_length
    }
}
