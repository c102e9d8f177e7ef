//! Spectral analysis: radix-2 FFT, Hilbert envelope, amplitude spectra

pub mod fft;
pub mod hilbert;
pub mod windowing;
pub mod analysis;

pub use fft::{fft_complex_power_of2, fft_in_place, FftEngine};
pub use hilbert::{analytic_signal, envelope, fast_hilbert_transform_power_of2, EnvelopeConfig};
pub use windowing::apply_window;
pub use analysis::{SpectrumAnalyzer, SpectrumConfig};
