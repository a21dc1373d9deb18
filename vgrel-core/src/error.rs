//! Error types for vgrel-core.

use thiserror::Error;

/// Result type for vgrel-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for vgrel-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A box with zero width or height was used where a ratio is taken.
    #[error("Degenerate box: {0}")]
    DegenerateBox(String),

    /// A category index does not fit the one-hot width.
    #[error("Category index {index} out of range for {num_categories} categories")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// One-hot width
        num_categories: usize,
    },
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a degenerate box error.
    #[must_use]
    pub fn degenerate_box(msg: impl Into<String>) -> Self {
        Self::DegenerateBox(msg.into())
    }
}
