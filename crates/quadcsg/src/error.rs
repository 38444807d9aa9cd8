//! Error types for objects and models.

use quadcsg_rules::RuleError;
use quadcsg_surface::SurfaceError;
use quadcsg_track::TrackError;
use thiserror::Error;

/// Errors that can occur while building or transforming solids.
#[derive(Error, Debug)]
pub enum CsgError {
    /// Surface parsing or transformation failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Rule parsing or rewriting failed.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Track or line construction failed.
    #[error(transparent)]
    Track(#[from] TrackError),

    /// A rule refers to a surface that is not defined.
    #[error("cell {cell} refers to undefined surface {surface}")]
    MissingSurface {
        /// Cell whose rule holds the reference.
        cell: i32,
        /// The undefined surface.
        surface: i32,
    },

    /// A rule refers through `#N` to a cell that is not defined.
    #[error("cell {cell} refers to undefined cell #{target}")]
    MissingCell {
        /// Cell whose rule holds the reference.
        cell: i32,
        /// The undefined cell.
        target: i32,
    },

    /// The `#N` references of a cell lead back to itself.
    #[error("cell {0} complements itself through #N references")]
    CellCycle(i32),

    /// A model already defines a cell with this number.
    #[error("duplicate cell {0}")]
    DuplicateCell(i32),

    /// Cell numbers are positive.
    #[error("cell number must be positive, got {0}")]
    InvalidCell(i32),

    /// Invalid engine settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A model file could not be read.
    #[error("invalid model file: {0}")]
    Config(#[from] toml::de::Error),

    /// A model could not be written.
    #[error("cannot write model: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

/// Result type for object and model operations.
pub type Result<T> = std::result::Result<T, CsgError>;
