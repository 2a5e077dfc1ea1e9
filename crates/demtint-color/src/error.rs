//! Error types for the color mapping crate.

use thiserror::Error;

/// Errors that can occur when mapping samples to colors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    /// All samples are invalid, or every valid sample has the same value.
    #[error("Empty or constant valid range: {reason}")]
    DegenerateRange {
        /// What made the range unusable.
        reason: String,
    },

    /// Grid dimensions do not agree with the supplied data.
    #[error("Shape mismatch: expected {expected_rows}x{expected_cols}, got {detail}")]
    ShapeMismatch {
        /// Expected number of rows.
        expected_rows: usize,
        /// Expected number of columns.
        expected_cols: usize,
        /// Description of what was actually supplied.
        detail: String,
    },

    /// No gradient registered under this name.
    #[error("Unknown gradient '{name}' (available: {available})")]
    UnknownGradient {
        /// Requested gradient name.
        name: String,
        /// Comma-separated list of registered names.
        available: String,
    },

    /// Opacity outside of (0, 1].
    #[error("Invalid opacity {0} (must be in (0, 1])")]
    InvalidOpacity(f32),

    /// Decimation stride of zero.
    #[error("Invalid stride {0} (must be at least 1)")]
    InvalidStride(usize),
}
