use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{http::client::RequestError, store::csv_file::StoreError};

/// Structure representing a candle (OHLCV data). Field order is the CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candle {
    pub time: i64,   // Bucket start, seconds since epoch (UTC).
    pub low: f64,    // Lowest price.
    pub high: f64,   // Highest price.
    pub open: f64,   // Opening price.
    pub close: f64,  // Closing price.
    pub volume: f64, // Trading volume.
}

/// Half open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

pub type Result<T> = std::result::Result<T, DownloadError>;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("fetch failed: {0}")]
    Request(#[from] RequestError),
    #[error("write failed: {0}")]
    Store(#[from] StoreError),
    #[error("invalid date range: {0}")]
    InvalidRange(String),
}
