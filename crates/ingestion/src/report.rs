//! Structured reporting of load outcomes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::builder::FailureKind;

/// One record field (or whole line) that kept a record out of the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// Symbol whose file the record came from.
    pub symbol: String,
    /// 1-based line number in the source file.
    pub line: u64,
    /// Header name of the failed field; `None` for line-level failures
    /// such as a column-count mismatch.
    pub field: Option<String>,
    /// Raw value found in the file, or a detail message for line-level
    /// failures.
    pub raw: String,
    /// Failure classification.
    pub kind: FailureKind,
}

/// A requested file that was skipped because it could not be opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub symbol: String,
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of one `load` call.
///
/// Fatal conditions surface as `Err` from `load`; everything collected here
/// is non-fatal and did not stop the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadReport {
    /// Files successfully opened and read.
    pub files_loaded: usize,
    /// Events appended to the stream.
    pub events_loaded: usize,
    /// Requested files skipped because they could not be opened.
    pub skipped_files: Vec<SkippedFile>,
    /// Record fields and lines that kept records out of the stream.
    pub record_failures: Vec<RecordFailure>,
}

impl LoadReport {
    /// True when nothing was skipped or dropped.
    pub fn is_clean(&self) -> bool {
        self.skipped_files.is_empty() && self.record_failures.is_empty()
    }

    /// Number of recorded failures of the given kind.
    pub fn count_of(&self, kind: FailureKind) -> usize {
        self.record_failures
            .iter()
            .filter(|failure| failure.kind == kind)
            .count()
    }
}
