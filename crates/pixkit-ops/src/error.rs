//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Images have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Parameter outside its accepted range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Buffer construction failed.
    #[error(transparent)]
    Core(#[from] pixkit_core::Error),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
