//! Configuration for the data feed.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a CSV-backed market data feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base directory holding one `<symbol>.csv` file per instrument.
    ///
    /// Required; loading without it is a configuration error.
    pub data_dir: Option<PathBuf>,
    /// Field delimiter of the data files.
    pub delimiter: u8,
}

impl FeedConfig {
    /// Config pointing at the given data directory, comma-delimited.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
            ..Self::default()
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            delimiter: b',',
        }
    }
}
