//! Per-record amplitude spectra
//!
//! Combines the FFT engine with windowing. One analyzer serves every record
//! of a batch; it owns its scratch space and is dropped with the batch.

use num_traits::Float;
use serde::{Deserialize, Serialize};

use super::fft::{to_db, FftEngine};
use super::windowing::{apply_weights_inplace, window_correction_factor};
use crate::error::{CoreError, CoreResult};
use crate::filters::windows::WindowSpec;
use crate::stats::{cast, max_index, mean};

/// Spectrum analyzer configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Window applied over the record before zero-padding (none = rectangular)
    pub window: Option<WindowSpec>,

    /// Remove the record mean before windowing
    pub subtract_mean: bool,

    /// Apply amplitude correction for windowing
    pub apply_correction: bool,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            window: None,
            subtract_mean: true,
            apply_correction: false,
        }
    }
}

/// Amplitude spectrum analyzer for records of a fixed length
pub struct SpectrumAnalyzer<T> {
    config: SpectrumConfig,
    record_length: usize,
    fft_engine: FftEngine<T>,
    weights: Option<Vec<f64>>,
    correction_factor: f64,
    scratch: Vec<T>,
}

impl<T: Float> SpectrumAnalyzer<T> {
    /// Create new spectrum analyzer
    ///
    /// # Arguments
    /// * `record_length` - Samples per record; spectra are zero-padded to the next power of two
    /// * `config` - Window and preprocessing options
    pub fn new(record_length: usize, config: SpectrumConfig) -> CoreResult<Self> {
        if record_length == 0 {
            return Err(CoreError::InvalidLength {
                len: 0,
                reason: "record length must be positive",
            });
        }

        let fft_engine = FftEngine::for_record_length(record_length)?;
        let weights = config.window.map(|w| w.generate(record_length, false));
        let correction_factor = match (&config.window, config.apply_correction) {
            (Some(window), true) => window_correction_factor(window, record_length),
            _ => 1.0,
        };

        Ok(Self {
            config,
            record_length,
            fft_engine,
            weights,
            correction_factor,
            scratch: Vec::with_capacity(record_length),
        })
    }

    /// Analyze one record and return its magnitude spectrum
    ///
    /// # Returns
    /// |X[k]| for k = 0..=N/2 where N is the padded length
    pub fn analyze(&mut self, record: &[T]) -> CoreResult<Vec<T>> {
        if record.len() != self.record_length {
            return Err(CoreError::ShapeMismatch {
                len: record.len(),
                record_length: self.record_length,
            });
        }

        self.scratch.clear();
        self.scratch.extend_from_slice(record);

        if self.config.subtract_mean {
            let offset = mean(&self.scratch);
            self.scratch.iter_mut().for_each(|x| *x = *x - offset);
        }
        if let Some(weights) = &self.weights {
            apply_weights_inplace(&mut self.scratch, weights);
        }

        let mut spectrum = self.fft_engine.compute_magnitude(&self.scratch)?;

        if self.correction_factor != 1.0 {
            let factor = cast::<T>(self.correction_factor);
            spectrum.iter_mut().for_each(|s| *s = *s * factor);
        }

        Ok(spectrum)
    }

    /// Analyze and return magnitude in dB
    pub fn analyze_db(&mut self, record: &[T], reference: T) -> CoreResult<Vec<T>> {
        let spectrum = self.analyze(record)?;
        Ok(spectrum.into_iter().map(|mag| to_db(mag, reference)).collect())
    }

    /// Frequency of the strongest non-DC bin
    ///
    /// # Returns
    /// `None` when the padded length has no bin above DC
    pub fn peak_frequency(&mut self, record: &[T], dt: f64) -> CoreResult<Option<f64>> {
        let spectrum = self.analyze(record)?;
        Ok(max_index(&spectrum[1..]).map(|k| self.fft_engine.bin_to_frequency(k + 1, dt)))
    }

    /// Get number of frequency bins
    pub fn num_bins(&self) -> usize {
        self.fft_engine.num_bins()
    }
}
