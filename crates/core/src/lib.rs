//! Core types and configuration for the historical market data feed.
//!
//! This crate provides shared types used by the ingestion crate and by
//! consumers of the event stream:
//! - Market event types (bars, depth snapshots)
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod events;

pub use config::FeedConfig;
pub use error::{Error, Result};
pub use events::*;
