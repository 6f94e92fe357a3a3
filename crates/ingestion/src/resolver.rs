//! Symbol-to-file resolution.

use feed_core::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Maps requested symbols to data files under a base directory.
///
/// Two resolution modes feed one candidate map: an empty symbol set
/// enumerates every `.csv` file in the directory, and named symbols map to
/// `<symbol>.csv` by convention. Both modes merge; named symbols win on key
/// collision. File existence is not checked here, the reader reports it.
pub struct FileResolver {
    data_dir: PathBuf,
}

impl FileResolver {
    /// Create a resolver rooted at the given directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolve the requested symbols to file paths.
    ///
    /// An empty `symbols` slice means "every data file in the directory".
    pub fn resolve(&self, symbols: &[String]) -> Result<BTreeMap<String, PathBuf>> {
        let mut files = BTreeMap::new();

        if symbols.is_empty() {
            for (symbol, path) in self.discover()? {
                files.insert(symbol, path);
            }
            debug!(count = files.len(), "data files discovered");
        }

        for symbol in symbols {
            let file = format!("{symbol}.csv");
            files.insert(symbol.clone(), self.data_dir.join(file));
        }

        Ok(files)
    }

    /// Enumerate every `.csv` file under the data directory.
    fn discover(&self) -> Result<Vec<(String, PathBuf)>> {
        let entries = fs::read_dir(&self.data_dir).map_err(|source| Error::Directory {
            path: self.data_dir.clone(),
            source,
        })?;

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::Directory {
                path: self.data_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                found.push((stem.to_string(), path));
            }
        }
        Ok(found)
    }
}
