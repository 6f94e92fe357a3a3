//! Delimited record reading.

use feed_core::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Field name to raw value mapping for one data line.
///
/// Transient: built per line, discarded once its event is built.
pub type RawRecord = HashMap<String, String>;

/// A parsed data line with its 1-based source line number.
#[derive(Debug, Clone)]
pub struct NumberedRecord {
    pub line: u64,
    pub fields: RawRecord,
}

/// A data line that could not be zipped against the header.
#[derive(Debug, Clone)]
pub struct MalformedLine {
    pub line: u64,
    pub detail: String,
}

/// Everything read from one file, in source order.
#[derive(Debug, Default)]
pub struct ReadOutcome {
    pub records: Vec<NumberedRecord>,
    pub malformed: Vec<MalformedLine>,
}

/// Reads one delimited file into field-to-value records.
///
/// The first line is the header; each subsequent line is zipped against it
/// in file order. Lines whose column count does not match the header are
/// skipped and reported in [`ReadOutcome::malformed`] rather than aborting
/// the read. The file handle lives only as long as the reader.
#[derive(Debug)]
pub struct RecordReader {
    reader: csv::Reader<File>,
    headers: Vec<String>,
    path: PathBuf,
}

impl RecordReader {
    /// Open `path` for reading with the given field delimiter.
    pub fn open(path: &Path, delimiter: u8) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|err| Error::FileRead {
                path: path.to_path_buf(),
                detail: err.to_string(),
            })?
            .iter()
            .map(|field| field.to_string())
            .collect();

        Ok(Self {
            reader,
            headers,
            path: path.to_path_buf(),
        })
    }

    /// Header field names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Read every data line, consuming the reader and releasing the file.
    pub fn read_all(mut self) -> Result<ReadOutcome> {
        let mut outcome = ReadOutcome::default();

        for result in self.reader.records() {
            match result {
                Ok(record) => {
                    let line = record.position().map(|pos| pos.line()).unwrap_or(0);
                    let fields = self
                        .headers
                        .iter()
                        .cloned()
                        .zip(record.iter().map(|value| value.to_string()))
                        .collect();
                    outcome.records.push(NumberedRecord { line, fields });
                }
                Err(err) => match err.kind() {
                    csv::ErrorKind::UnequalLengths {
                        pos,
                        expected_len,
                        len,
                    } => {
                        let line = pos.as_ref().map(|p| p.line()).unwrap_or(0);
                        outcome.malformed.push(MalformedLine {
                            line,
                            detail: format!("expected {expected_len} columns, found {len}"),
                        });
                    }
                    _ => {
                        return Err(Error::FileRead {
                            path: self.path.clone(),
                            detail: err.to_string(),
                        });
                    }
                },
            }
        }

        debug!(
            path = %self.path.display(),
            lines = outcome.records.len(),
            "data lines read"
        );
        Ok(outcome)
    }
}
