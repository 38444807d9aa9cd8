//! Error types for surface construction.

use thiserror::Error;

/// Errors that can occur while building or transforming a surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// Malformed surface definition text.
    #[error("invalid surface definition `{text}`: {message}")]
    Parse {
        /// The offending definition.
        text: String,
        /// What was wrong with it.
        message: String,
    },

    /// The definition starts with a keyword no surface type recognises.
    #[error("unknown surface keyword `{0}`")]
    UnknownKeyword(String),

    /// Surface names are positive so that rule leaves can carry a sign.
    #[error("surface name must be a positive integer, got {0}")]
    InvalidName(i32),

    /// A registry already holds a surface with this name.
    #[error("duplicate surface name {0}")]
    Duplicate(i32),

    /// `rotate` was given a matrix that is not a proper rotation.
    #[error("matrix is not a proper rotation")]
    NotRotation,
}

impl SurfaceError {
    /// Create a parse error.
    pub fn parse(text: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            text: text.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for surface operations.
pub type Result<T> = std::result::Result<T, SurfaceError>;
