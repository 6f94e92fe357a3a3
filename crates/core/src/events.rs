//! Market event types shared across the feed crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata common to every market event variant.
///
/// `time` is the sole ordering key of the event stream. `symbol` is always
/// stored upper-cased and is never empty for events built by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventHeader {
    /// Event timestamp (UTC).
    pub time: DateTime<Utc>,
    /// Instrument symbol, upper-cased.
    pub symbol: String,
}

impl EventHeader {
    /// Create a header, upper-casing the symbol.
    pub fn new(time: DateTime<Utc>, symbol: &str) -> Self {
        Self {
            time,
            symbol: symbol.to_uppercase(),
        }
    }
}

/// Aggregated OHLCV record for one symbol over one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarEvent {
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Dividend/split adjusted close price.
    pub adj_close: f64,
    /// Traded volume.
    pub volume: i64,
}

/// A single resting order-book level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Level price.
    pub price: f64,
    /// Resting quantity at this price.
    pub quantity: f64,
}

/// Order-book snapshot at one point in time.
///
/// Levels keep the order they had in the source data; they are never
/// re-sorted by price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthEvent {
    /// Ask levels in source order.
    pub asks: Vec<PriceLevel>,
    /// Bid levels in source order.
    pub bids: Vec<PriceLevel>,
}

/// A single event in the engine-facing market data stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// An OHLCV bar.
    Bar {
        header: EventHeader,
        bar: BarEvent,
    },
    /// An order-book depth snapshot.
    Depth {
        header: EventHeader,
        depth: DepthEvent,
    },
}

impl MarketEvent {
    /// Shared header of the event.
    #[inline]
    pub fn header(&self) -> &EventHeader {
        match self {
            MarketEvent::Bar { header, .. } => header,
            MarketEvent::Depth { header, .. } => header,
        }
    }

    /// Event timestamp.
    #[inline]
    pub fn time(&self) -> DateTime<Utc> {
        self.header().time
    }

    /// Instrument symbol.
    #[inline]
    pub fn symbol(&self) -> &str {
        &self.header().symbol
    }
}
