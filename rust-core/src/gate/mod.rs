//! Gate (border) detection
//!
//! Finds a feature in every record, smooths the resulting track across
//! records and fills records without a detection. The filled track then
//! locates fixed-length gates for extraction.

pub mod detect;
pub mod fill;
pub mod extract;
pub mod pipeline;

pub use detect::{detect_gates, GateDetector};
pub use extract::{extract_gates, gate_outline, gate_starts, gated_waveform};
pub use fill::{
    median_filter_gates, median_filter_gates_by_frame, midpoint_circle, nearest_neighbor_fill_2d,
    spline_fill,
};
pub use pipeline::{FillStrategy, GateConfig, GatePipeline, GateTrack};
