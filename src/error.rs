use std::path::PathBuf;

use lincomb::LookupError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("{0} not found as a Bockstein element")]
    NotAClass(String),

    /// The entry of `second` is the single generator `generator`, which was already solved for
    /// from the entry of `first`.
    #[error("Failed to invert {table}: {generator} is hit by both {first} and {second}")]
    NonInjective {
        table: String,
        generator: String,
        first: String,
        second: String,
    },

    /// Repeated division by 3 revisits a generator, so `table` is not the inverse of a
    /// multiplication by 3.
    #[error("Dividing d({generator}) by 3 using {table} does not terminate")]
    DivisionCycle { table: String, generator: String },

    #[error("Unknown beta operator: {0}")]
    UnknownOperator(String),

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
