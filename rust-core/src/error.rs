//! Error types for record processing

use thiserror::Error;

/// Errors raised by the waveform engine.
///
/// "No feature found" is never an error here; detectors return `Option`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A length violates a structural requirement (power of two, non-zero record length).
    #[error("invalid length {len}: {reason}")]
    InvalidLength { len: usize, reason: &'static str },

    /// Buffer shape does not match the declared record layout.
    #[error("buffer of length {len} does not hold whole records of length {record_length}")]
    ShapeMismatch { len: usize, record_length: usize },

    /// Not enough samples or knots for the requested operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A scalar parameter is outside its domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The computation is well-formed but numerically degenerate.
    #[error("numerically degenerate: {0}")]
    NumericDegenerate(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub(crate) fn not_power_of_two(len: usize) -> Self {
        CoreError::InvalidLength {
            len,
            reason: "length must be a power of two",
        }
    }
}
