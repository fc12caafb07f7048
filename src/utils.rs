use std::path::PathBuf;

use crate::{load::load_dataset, Context, Result};

/// The environment variable holding the default dataset prefix.
pub const DATA_ENV: &str = "BOCKSTEIN_DATA";

pub const DEFAULT_PREFIX: &str = "data/185";

/// Specifies which dataset to load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The tables live in `{file_prefix}_BPBocSS_table.txt` etc.
    pub file_prefix: PathBuf,
}

impl Config {
    pub fn new(file_prefix: impl Into<PathBuf>) -> Self {
        Self {
            file_prefix: file_prefix.into(),
        }
    }

    /// Load the dataset and build the derived tables.
    pub fn load(&self) -> Result<Context> {
        Context::new(load_dataset(&self.file_prefix)?)
    }
}

/// Reads the prefix from `BOCKSTEIN_DATA`, falling back to `data/185`.
impl Default for Config {
    fn default() -> Self {
        match std::env::var_os(DATA_ENV) {
            Some(prefix) if !prefix.is_empty() => Self::new(prefix),
            _ => Self::new(DEFAULT_PREFIX),
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG`. The default level is `info`.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()?;
    Ok(())
}
