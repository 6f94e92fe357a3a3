//! CSV market data loading.

use feed_core::{Error, FeedConfig, MarketEvent, Result};
use tracing::{debug, info, warn};

use crate::builder::{BarEventBuilder, DepthEventBuilder, EventBuilder, FailureKind};
use crate::reader::RecordReader;
use crate::report::{LoadReport, RecordFailure, SkippedFile};
use crate::resolver::FileResolver;

/// Loads per-symbol CSV files into one time-ordered event stream.
///
/// One file is fully read and accumulated before the next; the stream is
/// replaced wholesale on each successful [`load`](CsvFeed::load) and sorted
/// ascending by event time, with equal-time events keeping insertion order.
/// A loader instance is not meant for concurrent use; callers wanting
/// parallel loads run one feed per worker and merge afterwards.
pub struct CsvFeed<B> {
    config: FeedConfig,
    builder: B,
    stream: Vec<MarketEvent>,
}

/// Feed over OHLCV bar files.
pub type BarCsvFeed = CsvFeed<BarEventBuilder>;

/// Feed over order-book depth snapshot files.
pub type DepthCsvFeed = CsvFeed<DepthEventBuilder>;

impl CsvFeed<BarEventBuilder> {
    /// Bar feed over `Date, Open, High, Low, Close, Adj Close, Volume` files.
    pub fn bars(config: FeedConfig) -> Self {
        Self::new(config, BarEventBuilder)
    }
}

impl CsvFeed<DepthEventBuilder> {
    /// Depth feed over `t, a, b` snapshot files.
    pub fn depth(config: FeedConfig) -> Self {
        Self::new(config, DepthEventBuilder)
    }
}

impl<B: EventBuilder> CsvFeed<B> {
    /// Create a feed with the given configuration and record builder.
    pub fn new(config: FeedConfig, builder: B) -> Self {
        Self {
            config,
            builder,
            stream: Vec::new(),
        }
    }

    /// Load the given symbols into a fresh, time-ordered stream.
    ///
    /// An empty symbol set loads every data file under the configured
    /// directory. A file that cannot be opened is skipped and reported; a
    /// record that does not coerce is dropped and reported. Only
    /// configuration, directory-enumeration, and unrecoverable read errors
    /// are fatal, and they leave the previous stream untouched.
    pub fn load(&mut self, symbols: &[String]) -> Result<LoadReport> {
        let data_dir = self
            .config
            .data_dir
            .clone()
            .ok_or_else(|| Error::config("no data directory provided"))?;

        let files = FileResolver::new(data_dir).resolve(symbols)?;
        info!(files = files.len(), "loading symbol files");

        let mut stream = Vec::new();
        let mut report = LoadReport::default();

        for (symbol, path) in &files {
            debug!(%symbol, path = %path.display(), "loading symbol file");

            let reader = match RecordReader::open(path, self.config.delimiter) {
                Ok(reader) => reader,
                Err(err @ Error::FileOpen { .. }) => {
                    warn!(%symbol, %err, "skipping symbol file");
                    report.skipped_files.push(SkippedFile {
                        symbol: symbol.clone(),
                        path: path.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };

            let outcome = reader.read_all()?;
            report.files_loaded += 1;

            for malformed in outcome.malformed {
                warn!(%symbol, line = malformed.line, detail = %malformed.detail, "skipping malformed line");
                report.record_failures.push(RecordFailure {
                    symbol: symbol.clone(),
                    line: malformed.line,
                    field: None,
                    raw: malformed.detail,
                    kind: FailureKind::Columns,
                });
            }

            for record in outcome.records {
                let built = self.builder.build(&record.fields, symbol);
                if built.is_clean() {
                    stream.push(built.event);
                } else {
                    warn!(
                        %symbol,
                        line = record.line,
                        failures = built.failures.len(),
                        "skipping record with unparseable fields"
                    );
                    report
                        .record_failures
                        .extend(built.failures.into_iter().map(|failure| RecordFailure {
                            symbol: symbol.clone(),
                            line: record.line,
                            field: Some(failure.field),
                            raw: failure.raw,
                            kind: failure.kind,
                        }));
                }
            }
        }

        // Stable sort: equal timestamps keep insertion order.
        stream.sort_by_key(|event| event.time());
        report.events_loaded = stream.len();
        self.stream = stream;

        Ok(report)
    }

    /// The loaded stream, ascending by event time.
    pub fn stream(&self) -> &[MarketEvent] {
        &self.stream
    }

    /// Number of events in the stream.
    pub fn len(&self) -> usize {
        self.stream.len()
    }

    /// True when the stream holds no events.
    pub fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    /// Drop the loaded stream.
    pub fn reset(&mut self) {
        self.stream.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::fs;
    use tempfile::TempDir;

    fn config_for(tmp: &TempDir) -> FeedConfig {
        FeedConfig::with_dir(tmp.path())
    }

    fn write_file(tmp: &TempDir, name: &str, content: &str) {
        fs::write(tmp.path().join(name), content).unwrap();
    }

    const BAR_HEADER: &str = "Date,Open,High,Low,Close,Adj Close,Volume\n";

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_load_bars() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp,
            "aapl.csv",
            &format!("{BAR_HEADER}2020-01-03,105,112,101,110,110,1500\n2020-01-02,100,110,90,105,105,1000\n"),
        );

        let mut feed = BarCsvFeed::bars(config_for(&tmp));
        let report = feed.load(&symbols(&["aapl"])).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.files_loaded, 1);
        assert_eq!(report.events_loaded, 2);
        assert_eq!(feed.len(), 2);

        // Ascending by time, regardless of file order.
        let first = &feed.stream()[0];
        assert_eq!(first.symbol(), "AAPL");
        assert_eq!(
            first.time(),
            Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap()
        );
        let MarketEvent::Bar { bar, .. } = first else {
            panic!("expected bar event");
        };
        assert!((bar.open - 100.0).abs() < 1e-10);
        assert_eq!(bar.volume, 1000);
        assert!(feed.stream()[0].time() < feed.stream()[1].time());
    }

    #[test]
    fn test_load_depth() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp,
            "btcusdt.csv",
            "t,a,b\n1579564800000,\"[[100.5,2]]\",\"[[99.5,3]]\"\n",
        );

        let mut feed = DepthCsvFeed::depth(config_for(&tmp));
        let report = feed.load(&symbols(&["btcusdt"])).unwrap();

        assert!(report.is_clean());
        assert_eq!(feed.len(), 1);

        let event = &feed.stream()[0];
        assert_eq!(event.symbol(), "BTCUSDT");
        assert_eq!(
            event.time(),
            DateTime::from_timestamp_millis(1_579_564_800_000).unwrap()
        );
        let MarketEvent::Depth { depth, .. } = event else {
            panic!("expected depth event");
        };
        assert!((depth.asks[0].price - 100.5).abs() < 1e-10);
        assert!((depth.bids[0].quantity - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_missing_data_dir_is_fatal() {
        let mut feed = BarCsvFeed::bars(FeedConfig::default());
        let err = feed.load(&symbols(&["aapl"])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(feed.is_empty());
    }

    #[test]
    fn test_unlistable_dir_is_fatal_in_discover_mode() {
        let mut feed = BarCsvFeed::bars(FeedConfig::with_dir("/nonexistent"));
        let err = feed.load(&[]).unwrap_err();
        assert!(matches!(err, Error::Directory { .. }));
    }

    #[test]
    fn test_discover_all_loads_every_file() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp,
            "aapl.csv",
            &format!("{BAR_HEADER}2020-01-02,100,110,90,105,105,1000\n"),
        );
        write_file(
            &tmp,
            "msft.csv",
            &format!("{BAR_HEADER}2020-01-02,200,210,190,205,205,2000\n"),
        );
        write_file(&tmp, "readme.txt", "not data\n");

        let mut feed = BarCsvFeed::bars(config_for(&tmp));
        let report = feed.load(&[]).unwrap();

        assert_eq!(report.files_loaded, 2);
        assert_eq!(feed.len(), 2);
        let mut seen: Vec<&str> = feed.stream().iter().map(|e| e.symbol()).collect();
        seen.sort();
        assert_eq!(seen, ["AAPL", "MSFT"]);
    }

    #[test]
    fn test_partial_failure_drops_only_bad_record() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp,
            "btcusdt.csv",
            "t,a,b\n\
             1579564800000,\"[[100.5,2]]\",\"[[99.5,3]]\"\n\
             1579564860000,\"[[100.6,1]\",\"[[99.6,1]]\"\n\
             1579564920000,\"[[100.7,4]]\",\"[[99.7,2]]\"\n",
        );
        write_file(
            &tmp,
            "ethusdt.csv",
            "t,a,b\n1579564800000,\"[[10.5,2]]\",\"[[9.5,3]]\"\n",
        );

        let mut feed = DepthCsvFeed::depth(config_for(&tmp));
        let report = feed
            .load(&symbols(&["btcusdt", "ethusdt"]))
            .unwrap();

        // Three valid lines survive out of four; the next symbol still loads.
        assert_eq!(feed.len(), 3);
        assert_eq!(report.record_failures.len(), 1);
        assert_eq!(report.record_failures[0].symbol, "btcusdt");
        assert_eq!(report.record_failures[0].line, 3);
        assert_eq!(report.record_failures[0].kind, FailureKind::Json);
        assert_eq!(report.count_of(FailureKind::Json), 1);
    }

    #[test]
    fn test_missing_symbol_file_skipped_batch_continues() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp,
            "aapl.csv",
            &format!("{BAR_HEADER}2020-01-02,100,110,90,105,105,1000\n"),
        );

        let mut feed = BarCsvFeed::bars(config_for(&tmp));
        let report = feed.load(&symbols(&["aapl", "tsla"])).unwrap();

        assert_eq!(report.files_loaded, 1);
        assert_eq!(report.skipped_files.len(), 1);
        assert_eq!(report.skipped_files[0].symbol, "tsla");
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.stream()[0].symbol(), "AAPL");
    }

    #[test]
    fn test_column_mismatch_reported_rest_loads() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp,
            "aapl.csv",
            &format!(
                "{BAR_HEADER}2020-01-02,100,110,90,105,105,1000\n\
                 2020-01-03,105,112\n\
                 2020-01-06,110,115,108,112,112,900\n"
            ),
        );

        let mut feed = BarCsvFeed::bars(config_for(&tmp));
        let report = feed.load(&symbols(&["aapl"])).unwrap();

        assert_eq!(feed.len(), 2);
        assert_eq!(report.count_of(FailureKind::Columns), 1);
        assert_eq!(report.record_failures[0].line, 3);
        assert!(report.record_failures[0].field.is_none());
    }

    #[test]
    fn test_bad_field_drops_record() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp,
            "aapl.csv",
            &format!(
                "{BAR_HEADER}2020-01-02,100,110,90,105,105,1000\n\
                 2020-01-03,105,112,101,110,110,many\n"
            ),
        );

        let mut feed = BarCsvFeed::bars(config_for(&tmp));
        let report = feed.load(&symbols(&["aapl"])).unwrap();

        assert_eq!(feed.len(), 1);
        assert_eq!(report.count_of(FailureKind::Integer), 1);
        assert_eq!(report.record_failures[0].field.as_deref(), Some("Volume"));
    }

    #[test]
    fn test_sort_is_stable_on_equal_times() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp,
            "btcusdt.csv",
            "t,a,b\n\
             1579564800000,\"[[1.0,1]]\",\"[]\"\n\
             1579564800000,\"[[2.0,1]]\",\"[]\"\n\
             1579564800000,\"[[3.0,1]]\",\"[]\"\n",
        );

        let mut feed = DepthCsvFeed::depth(config_for(&tmp));
        feed.load(&symbols(&["btcusdt"])).unwrap();

        let first_asks: Vec<f64> = feed
            .stream()
            .iter()
            .map(|event| {
                let MarketEvent::Depth { depth, .. } = event else {
                    panic!("expected depth event");
                };
                depth.asks[0].price
            })
            .collect();
        assert_eq!(first_asks, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_load_is_idempotent_across_instances() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp,
            "aapl.csv",
            &format!(
                "{BAR_HEADER}2020-01-03,105,112,101,110,110,1500\n\
                 2020-01-02,100,110,90,105,105,1000\n"
            ),
        );

        let mut first = BarCsvFeed::bars(config_for(&tmp));
        let mut second = BarCsvFeed::bars(config_for(&tmp));
        first.load(&symbols(&["aapl"])).unwrap();
        second.load(&symbols(&["aapl"])).unwrap();

        assert_eq!(first.stream(), second.stream());
    }

    #[test]
    fn test_stream_replaced_wholesale() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp,
            "aapl.csv",
            &format!("{BAR_HEADER}2020-01-02,100,110,90,105,105,1000\n"),
        );
        write_file(
            &tmp,
            "msft.csv",
            &format!("{BAR_HEADER}2020-01-02,200,210,190,205,205,2000\n"),
        );

        let mut feed = BarCsvFeed::bars(config_for(&tmp));
        feed.load(&symbols(&["aapl"])).unwrap();
        assert_eq!(feed.stream()[0].symbol(), "AAPL");

        feed.load(&symbols(&["msft"])).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.stream()[0].symbol(), "MSFT");

        feed.reset();
        assert!(feed.is_empty());
    }
}
