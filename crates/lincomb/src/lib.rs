//! Sparse linear combinations of named generators over F_3, and sparse linear maps given by their
//! values on generators.
//!
//! Coefficients may be [`Coefficient::Unknown`], which stands for a nonzero scalar whose value was
//! not determined. This is absorbing under all arithmetic, so that any answer that depends on an
//! undetermined value is visibly marked as such.

#![deny(clippy::use_self)]

mod coefficient;
mod lincomb;
mod parser;
mod table;

pub use coefficient::{Coefficient, PRIME};
pub use lincomb::LinComb;
pub use parser::parse_lincomb;
pub use table::Table;

/// A generator was looked up in a table that does not have it in its domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{generator} not found in table {table}")]
pub struct LookupError {
    pub table: String,
    pub generator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to parse linear combination {input:?}:\n{message}")]
pub struct ParseError {
    pub input: String,
    pub message: String,
}
