//! Error types for boolean minimization.

use thiserror::Error;

/// Errors raised by truth-vector operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogicError {
    /// Two truth vectors of different widths were compared or combined.
    #[error("truth vectors differ in width: {0} vs {1}")]
    SizeMismatch(usize, usize),

    /// Combination requires exactly one opposed position and no other difference.
    #[error("terms are not adjacent ({0} differing positions)")]
    NotAdjacent(usize),

    /// The truth table would not fit in memory.
    #[error("{0} variables exceed the supported maximum of {max}", max = crate::MAX_VARIABLES)]
    TooManyVariables(usize),

    /// A minterm index is not below `2^size`.
    #[error("minterm {minterm} out of range for {size} variables")]
    MintermOutOfRange {
        /// The offending index.
        minterm: usize,
        /// Width of the truth table.
        size: usize,
    },
}

/// Result type for logic operations.
pub type Result<T> = std::result::Result<T, LogicError>;
