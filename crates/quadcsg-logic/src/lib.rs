#![warn(missing_docs)]

//! Boolean minimization for quadcsg rule trees.
//!
//! A [`BnId`] is one row, or one group of rows, of a truth table whose
//! variables are the surfaces a rule refers to. [`minimize`] finds the prime
//! implicants of a function by Quine–McCluskey merging and selects a small
//! cover of its true rows.

mod bnid;
mod error;
mod implicant;

pub use bnid::{BnId, DONT_CARE, FALSE, TRUE};
pub use error::{LogicError, Result};
pub use implicant::{minimal_cover, minimize, prime_implicants};

/// Widest truth table [`minimize`] accepts.
pub const MAX_VARIABLES: usize = 24;
