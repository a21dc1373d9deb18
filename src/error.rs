//! Error types for vgrel.

use std::path::Path;
use thiserror::Error;

/// Result type for vgrel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for vgrel operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset loading/shape error.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A category name is neither in the entity list nor in any synonym list.
    #[error("{0} not found in synonyms")]
    UnknownName(String),

    /// A predicate could not be mapped to a known label column or count.
    #[error("Unknown predicate: {0}")]
    UnknownPredicate(String),

    /// Image decoding/encoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Crop embedding failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Primitive construction/extraction error.
    #[error(transparent)]
    Core(#[from] vgrel_core::Error),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a dataset error.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Error::Dataset(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create an embedding error.
    pub fn embedding(msg: impl Into<String>) -> Self {
        Error::Embedding(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Wrap an IO error from `path`, keeping its kind and naming the path.
    pub fn io_at(path: &Path, err: std::io::Error) -> Self {
        Error::Io(std::io::Error::new(err.kind(), format!("{}: {}", path.display(), err)))
    }
}
