//! Error types for the feed crates.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors raised by the data loading pipeline.
///
/// Per-record coercion problems are not represented here; they are collected
/// into the load report and never abort a load.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (e.g. no data directory set).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The data directory could not be enumerated.
    #[error("Cannot list data directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A symbol's data file could not be opened.
    #[error("Cannot open data file {path:?}: {source}")]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Unrecoverable I/O error while reading a data file.
    #[error("Error reading data file {path:?}: {detail}")]
    FileRead { path: PathBuf, detail: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
