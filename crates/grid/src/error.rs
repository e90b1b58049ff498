//! Error types for the drought-grid crate.

/// Error type for all fallible operations in the drought-grid crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Returned when a coordinate axis has no values.
    #[error("coordinate axis '{axis}' is empty")]
    EmptyAxis {
        /// Name of the axis.
        axis: &'static str,
    },

    /// Returned when a coordinate value is NaN or infinite.
    #[error("coordinate axis '{axis}' has a non-finite value at index {index}")]
    NonFiniteCoordinate {
        /// Name of the axis.
        axis: &'static str,
        /// Position of the offending value.
        index: usize,
    },

    /// Returned when an array's shape does not agree with its axes.
    #[error("{what} shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// What was being checked.
        what: String,
        /// Shape implied by the axes.
        expected: Vec<usize>,
        /// Actual array shape.
        got: Vec<usize>,
    },

    /// Returned when a time axis is not strictly increasing.
    #[error("time axis is not strictly increasing at index {index}")]
    NonMonotonicTime {
        /// First index that is not after its predecessor.
        index: usize,
    },

    /// Returned when two grids that must share axes do not.
    #[error("coordinate mismatch: {what}")]
    CoordinateMismatch {
        /// Description of the mismatch.
        what: String,
    },

    /// Returned when a smoothing width is not finite and positive.
    #[error("invalid smoothing sigma: {sigma} (must be finite and > 0)")]
    InvalidSigma {
        /// The rejected sigma.
        sigma: f64,
    },

    /// Returned when a time index lies outside a series.
    #[error("time index {index} out of range for series of length {len}")]
    TimeIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Series length.
        len: usize,
    },
}
