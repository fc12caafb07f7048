//! Bockstein differentials and multiplication by beta family elements in the 3-primary algebraic
//! Novikov spectral sequence.
//!
//! The input is a dataset of tables computed elsewhere: the Bockstein spectral sequence computing
//! the algebraic Novikov $E_2$ page of the sphere from that of the Moore spectrum, multiplication
//! tables in both spectral sequences, and a translation between their names for classes. From
//! these we build a [`Context`], which also contains the inverse tables that are needed, and then
//! evaluate [`Operator`]s on linear combinations of classes.
//!
//! All arithmetic happens in [`lincomb::LinComb`], i.e. with $\mathbb{F}_3$ coefficients, where a
//! coefficient may also be `?` if it was not determined.

#![deny(clippy::use_self)]

pub mod bockstein_table;
pub mod context;
pub mod degree;
mod error;
pub mod inverter;
pub mod load;
pub mod operator;
pub mod utils;

pub use context::{Context, Dataset};
pub use error::{Error, Result};
pub use inverter::{Ambiguity, Inversion, MapInverter};
pub use operator::{BetaOperator, Operator};

pub use lincomb::{Coefficient, LinComb, Table};
