//! Error types for rule parsing and rewriting.

use quadcsg_logic::LogicError;
use thiserror::Error;

/// Errors that can occur while building or rewriting a rule tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// Malformed rule text.
    #[error("rule parse error at byte {pos}: {message}")]
    Parse {
        /// Byte offset into the rule text.
        pos: usize,
        /// What went wrong.
        message: String,
    },

    /// The rule text contains no terms.
    #[error("empty rule")]
    Empty,

    /// Truth-table rewriting was asked for more surfaces than allowed.
    #[error("rule refers to {count} surfaces, more than the limit of {limit}")]
    TooManySurfaces {
        /// Distinct surfaces in the rule.
        count: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// Truth-table rewriting cannot see through a cell complement.
    #[error("rule contains cell complement #{0}")]
    CellComplement(i32),

    /// Failure inside the minimizer.
    #[error("minimization failed: {0}")]
    Logic(#[from] LogicError),
}

impl RuleError {
    /// Create a parse error.
    pub fn parse(pos: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            pos,
            message: message.into(),
        }
    }
}

/// Result type for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
