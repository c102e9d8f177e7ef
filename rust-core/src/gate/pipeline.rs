//! Gate pipeline: detect, median-filter, fill
//!
//! The pipeline keeps every intermediate track so a host can display the raw
//! detections next to the filled result.

use ndarray::Array2;
use num_traits::Float;
use serde::{Deserialize, Serialize};

use super::detect::{detect_gates, GateDetector};
use super::extract::{extract_gates, gate_outline, gate_starts, gated_waveform};
use super::fill::{
    median_filter_gates, median_filter_gates_by_frame, nearest_neighbor_fill_2d, spline_fill,
};
use crate::error::{CoreError, CoreResult};
use crate::filters::windows::WindowSpec;
use crate::stats::cast;

/// How missing gates are filled after median filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "method")]
pub enum FillStrategy {
    /// Leave gaps as they are
    Disabled,
    /// Natural spline through the detected records
    #[default]
    Spline,
    /// Nearest detections on a `frames × records_per_frame` grid
    NearestNeighbor2d { records_per_frame: usize },
}

/// Gate pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Feature that marks the gate
    pub detector: GateDetector,

    /// Detection threshold in sample units
    pub threshold: f64,

    /// First sample searched in every record
    pub search_start: usize,

    /// Median filter radius over records (0 disables)
    pub median_radius: usize,

    /// Gap fill after median filtering
    pub fill: FillStrategy,

    /// Samples per gate
    pub gate_length: usize,

    /// Signed shift from the detected position to the gate start
    pub offset: isize,

    /// Weighting applied over extracted gates
    pub window: Option<WindowSpec>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            detector: GateDetector::PositiveThreshold,
            threshold: 0.0,
            search_start: 0,
            median_radius: 2,
            fill: FillStrategy::Spline,
            gate_length: 64,
            offset: 0,
            window: None,
        }
    }
}

/// Gate positions at every pipeline stage, one entry per record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateTrack {
    pub detected: Vec<Option<usize>>,
    pub filtered: Vec<Option<usize>>,
    pub filled: Vec<Option<usize>>,
}

impl GateTrack {
    pub fn len(&self) -> usize {
        self.filled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filled.is_empty()
    }

    /// Records that had a raw detection
    pub fn detected_count(&self) -> usize {
        self.detected.iter().flatten().count()
    }
}

/// Gate detection pipeline for one parameter set
#[derive(Debug, Clone)]
pub struct GatePipeline {
    config: GateConfig,
}

impl GatePipeline {
    /// Validate a configuration
    pub fn new(config: GateConfig) -> CoreResult<Self> {
        if !config.threshold.is_finite() {
            return Err(CoreError::InvalidParameter(format!(
                "gate threshold must be finite, got {}",
                config.threshold
            )));
        }
        if config.gate_length == 0 {
            return Err(CoreError::InvalidLength {
                len: 0,
                reason: "gate length must be positive",
            });
        }
        if let FillStrategy::NearestNeighbor2d { records_per_frame: 0 } = config.fill {
            return Err(CoreError::InvalidLength {
                len: 0,
                reason: "records per frame must be positive",
            });
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Detect, filter and fill the gate track of a buffer
    pub fn run<T: Float>(&self, samples: &[T], record_length: usize) -> CoreResult<GateTrack> {
        let config = &self.config;
        let detected = detect_gates(
            samples,
            record_length,
            config.detector,
            cast(config.threshold),
            config.search_start,
        )?;
        let filtered = match config.fill {
            FillStrategy::NearestNeighbor2d { records_per_frame } => {
                median_filter_gates_by_frame(&detected, records_per_frame, config.median_radius)?
            }
            _ => median_filter_gates(&detected, config.median_radius),
        };
        let filled = match config.fill {
            FillStrategy::Disabled => filtered.clone(),
            FillStrategy::Spline => spline_fill(&filtered, record_length)?,
            FillStrategy::NearestNeighbor2d { records_per_frame } => {
                nearest_neighbor_fill_2d(&filtered, records_per_frame)?
            }
        };

        let track = GateTrack {
            detected,
            filtered,
            filled,
        };
        tracing::debug!(
            records = track.len(),
            detected = track.detected_count(),
            filled = track.filled.iter().flatten().count(),
            "gate pipeline finished"
        );
        Ok(track)
    }

    /// Gate starts of the filled track with the configured offset applied
    pub fn starts(&self, track: &GateTrack, record_length: usize) -> Vec<Option<usize>> {
        gate_starts(&track.filled, self.config.offset, record_length)
    }

    /// Outline of the gated region
    pub fn outline(&self, track: &GateTrack, record_length: usize) -> Vec<(usize, usize)> {
        gate_outline(&self.starts(track, record_length), self.config.gate_length, record_length)
    }

    /// `records × gate_length` matrix of gated samples, window-weighted when configured
    pub fn extract<T: Float>(
        &self,
        samples: &[T],
        record_length: usize,
        track: &GateTrack,
    ) -> CoreResult<Array2<T>> {
        extract_gates(
            samples,
            record_length,
            &self.starts(track, record_length),
            self.config.gate_length,
            self.config.window.as_ref(),
        )
    }

    /// Buffer copy with samples outside the gates zeroed
    pub fn gated_waveform<T: Float>(
        &self,
        samples: &[T],
        record_length: usize,
        track: &GateTrack,
    ) -> CoreResult<Vec<T>> {
        gated_waveform(
            samples,
            record_length,
            &self.starts(track, record_length),
            self.config.gate_length,
        )
    }
}
