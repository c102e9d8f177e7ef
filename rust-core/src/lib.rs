//! Waveform Workbench - record-oriented signal processing core
//!
//! A waveform buffer is a flat run of samples holding many records of equal
//! length (one row of a 2-D raster each). The crate provides the numerical
//! engine that works on such buffers: radix-2 FFT, Hilbert envelope,
//! parameterized windows, Reinsch smoothing splines, streaming statistics
//! and gate detection with gap filling. Python bindings are available behind
//! the `python` feature.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod error;
pub mod stats;
pub mod filters;
pub mod spectrum;
pub mod spline;
pub mod gate;
pub mod records;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::{CoreError, CoreResult};
pub use filters::{WindowSpec, WindowType};
pub use gate::{GateConfig, GatePipeline, GateTrack};
pub use records::RecordLayout;
pub use spectrum::{FftEngine, SpectrumAnalyzer, SpectrumConfig};
pub use spline::SmoothingSpline;
