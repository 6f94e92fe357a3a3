//! Raw record to market event conversion.

use chrono::{DateTime, NaiveDate, NaiveTime};
use feed_core::{BarEvent, DepthEvent, EventHeader, MarketEvent, PriceLevel};
use serde::{Deserialize, Serialize};

use crate::reader::RawRecord;

/// Calendar format of the `Date` field in bar files.
const BAR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a field failed to coerce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Line column count did not match the header.
    Columns,
    /// Calendar date did not match the expected format.
    Date,
    /// Decimal field did not parse.
    Decimal,
    /// Integer field did not parse.
    Integer,
    /// Epoch-millisecond timestamp did not parse.
    Timestamp,
    /// JSON depth side did not decode.
    Json,
}

/// One field of one record that failed to coerce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFailure {
    /// Header name of the field.
    pub field: String,
    /// Raw value found in the file.
    pub raw: String,
    /// Failure classification.
    pub kind: FailureKind,
}

/// Outcome of building one record: the event plus any field failures.
///
/// Construction always completes; a field that fails to coerce takes its
/// type's zero value and is reported here instead of aborting the build.
#[derive(Debug, Clone)]
pub struct BuiltRecord {
    pub event: MarketEvent,
    pub failures: Vec<FieldFailure>,
}

impl BuiltRecord {
    /// True when every field coerced cleanly.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Converts one raw record into a typed, timestamped market event.
pub trait EventBuilder {
    fn build(&self, record: &RawRecord, symbol: &str) -> BuiltRecord;
}

fn field(record: &RawRecord, name: &str) -> String {
    record.get(name).cloned().unwrap_or_default()
}

fn decimal_field(record: &RawRecord, name: &str, failures: &mut Vec<FieldFailure>) -> f64 {
    let raw = field(record, name);
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            failures.push(FieldFailure {
                field: name.to_string(),
                raw,
                kind: FailureKind::Decimal,
            });
            0.0
        }
    }
}

fn integer_field(record: &RawRecord, name: &str, failures: &mut Vec<FieldFailure>) -> i64 {
    let raw = field(record, name);
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            failures.push(FieldFailure {
                field: name.to_string(),
                raw,
                kind: FailureKind::Integer,
            });
            0
        }
    }
}

/// Builds OHLCV bar events from
/// `Date, Open, High, Low, Close, Adj Close, Volume` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarEventBuilder;

impl EventBuilder for BarEventBuilder {
    fn build(&self, record: &RawRecord, symbol: &str) -> BuiltRecord {
        let mut failures = Vec::new();

        let raw_date = field(record, "Date");
        let time = match NaiveDate::parse_from_str(&raw_date, BAR_DATE_FORMAT) {
            Ok(date) => date.and_time(NaiveTime::MIN).and_utc(),
            Err(_) => {
                failures.push(FieldFailure {
                    field: "Date".to_string(),
                    raw: raw_date,
                    kind: FailureKind::Date,
                });
                DateTime::UNIX_EPOCH
            }
        };

        let bar = BarEvent {
            open: decimal_field(record, "Open", &mut failures),
            high: decimal_field(record, "High", &mut failures),
            low: decimal_field(record, "Low", &mut failures),
            close: decimal_field(record, "Close", &mut failures),
            adj_close: decimal_field(record, "Adj Close", &mut failures),
            volume: integer_field(record, "Volume", &mut failures),
        };

        BuiltRecord {
            event: MarketEvent::Bar {
                header: EventHeader::new(time, symbol),
                bar,
            },
            failures,
        }
    }
}

/// Builds order-book depth events from `t, a, b` snapshot records, where
/// `a` and `b` are JSON arrays of `[price, quantity]` pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthEventBuilder;

fn depth_side(record: &RawRecord, name: &str, failures: &mut Vec<FieldFailure>) -> Vec<PriceLevel> {
    let raw = field(record, name);
    match serde_json::from_str::<Vec<[f64; 2]>>(&raw) {
        Ok(pairs) => pairs
            .into_iter()
            .map(|[price, quantity]| PriceLevel { price, quantity })
            .collect(),
        Err(_) => {
            failures.push(FieldFailure {
                field: name.to_string(),
                raw,
                kind: FailureKind::Json,
            });
            Vec::new()
        }
    }
}

impl EventBuilder for DepthEventBuilder {
    fn build(&self, record: &RawRecord, symbol: &str) -> BuiltRecord {
        let mut failures = Vec::new();

        let raw_ts = field(record, "t");
        let time = match raw_ts
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
        {
            Some(time) => time,
            None => {
                failures.push(FieldFailure {
                    field: "t".to_string(),
                    raw: raw_ts,
                    kind: FailureKind::Timestamp,
                });
                DateTime::UNIX_EPOCH
            }
        };

        // Level order is whatever the source arrays held; no re-sorting.
        let asks = depth_side(record, "a", &mut failures);
        let bids = depth_side(record, "b", &mut failures);

        BuiltRecord {
            event: MarketEvent::Depth {
                header: EventHeader::new(time, symbol),
                depth: DepthEvent { asks, bids },
            },
            failures,
        }
    }
}
