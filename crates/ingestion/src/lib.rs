//! Historical market data ingestion.
//!
//! Reads per-symbol CSV files (OHLCV bars or order-book depth snapshots)
//! and builds the time-ordered event stream consumed by the backtest
//! engine:
//! - Symbol-to-file resolution
//! - Delimited record reading
//! - Per-record event building with error-tolerant accumulation
//! - Chronological stream ordering

pub mod builder;
pub mod loader;
pub mod reader;
pub mod report;
pub mod resolver;

pub use builder::{
    BarEventBuilder, BuiltRecord, DepthEventBuilder, EventBuilder, FailureKind, FieldFailure,
};
pub use loader::{BarCsvFeed, CsvFeed, DepthCsvFeed};
pub use reader::{RawRecord, RecordReader};
pub use report::{LoadReport, RecordFailure, SkippedFile};
pub use resolver::FileResolver;
