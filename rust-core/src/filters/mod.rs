//! Window functions and centered moving-window filters

pub mod windows;
pub mod moving;

pub use windows::{WindowType, WindowSpec, generate_window, generate_window_single_sided};
pub use moving::{moving_average, moving_zero_crossing_count, count_zero_crossings};
