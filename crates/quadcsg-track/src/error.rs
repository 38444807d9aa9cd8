//! Error types for lines and tracks.

use thiserror::Error;

/// Errors raised when constructing a line or track.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    /// The direction vector has zero length.
    #[error("direction vector has zero length")]
    ZeroDirection,

    /// The origin or direction contains NaN or infinity.
    #[error("non-finite {0}")]
    NonFinite(&'static str),
}

/// Result type for track operations.
pub type Result<T> = std::result::Result<T, TrackError>;
