//! Flat multi-record waveform buffers and batch operations over them

pub mod buffer;
pub mod processor;

pub use buffer::{PaddedRecords, RecordLayout};
pub use processor::{
    amplitude_spectrum_per_record, envelope, envelope_in_place, mean_record, min_index_per_record,
    moving_average_in_place, moving_zero_crossing_count, skewness_per_record, smooth_records,
    spectral_max_frequency, subtract_from_waveform_in_place, variance_per_record,
    waveform_math_in_place, zero_crossing_count_per_record, zero_crossing_positions, MathOp,
    Operand, Reference,
};
