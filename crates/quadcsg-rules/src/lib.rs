#![warn(missing_docs)]

//! Boolean rule trees over signed surface references.
//!
//! A rule such as `10 -11 : #(12 13)` describes a solid: a positive number
//! is the inside of that surface, a negative number the outside, a space is
//! intersection and `:` is union (lower precedence). `#N` complements
//! another cell and `#( … )` complements a group.
//!
//! [`RuleTree`] owns the parsed tree and provides the structural rewrites
//! (duplicate and complementary-pair removal, leaf removal, surface
//! substitution) and truth-table minimization into DNF or CNF.

mod error;
mod minimize;
mod parse;
mod rule;
mod tree;

pub use error::{Result, RuleError};
pub use parse::parse_rule;
pub use rule::{Resolver, Rule, SurfPoint};
pub use tree::RuleTree;
