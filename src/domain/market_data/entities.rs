use serde::{Deserialize, Serialize};

use super::value_objects::{TimeRange, Timestamp};

/// Domain entity - one candle ready for the chart
///
/// Only [`CandlestickRecord::from_ohlc`] builds records, so every instance
/// satisfies `low <= body_low <= body_high <= high` with finite fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandlestickRecord {
    timestamp: Timestamp,
    label: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    is_bullish: bool,
    body_high: f64,
    body_low: f64,
}

impl CandlestickRecord {
    /// Derive body bounds and direction from open/close. Returns `None` when a
    /// price is non-finite or the wicks do not enclose the body.
    pub fn from_ohlc(
        timestamp: Timestamp,
        label: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Option<Self> {
        if ![open, high, low, close].iter().all(|v| v.is_finite()) {
            return None;
        }
        let body_high = open.max(close);
        let body_low = open.min(close);
        if low > body_low || high < body_high {
            return None;
        }
        Some(Self {
            timestamp,
            label: label.into(),
            open,
            high,
            low,
            close,
            is_bullish: close >= open,
            body_high,
            body_low,
        })
    }

    /// Open = high = low = close. A non-finite price collapses to zero.
    pub fn flat(timestamp: Timestamp, label: impl Into<String>, price: f64) -> Self {
        let price = if price.is_finite() { price } else { 0.0 };
        Self {
            timestamp,
            label: label.into(),
            open: price,
            high: price,
            low: price,
            close: price,
            is_bullish: true,
            body_high: price,
            body_low: price,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn open(&self) -> f64 {
        self.open
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn close(&self) -> f64 {
        self.close
    }

    pub fn is_bullish(&self) -> bool {
        self.is_bullish
    }

    pub fn body_high(&self) -> f64 {
        self.body_high
    }

    pub fn body_low(&self) -> f64 {
        self.body_low
    }

    pub fn body_size(&self) -> f64 {
        self.body_high - self.body_low
    }

    pub fn wick_high(&self) -> f64 {
        self.high - self.body_high
    }

    pub fn wick_low(&self) -> f64 {
        self.body_low - self.low
    }
}

/// Where the records of a [`SeriesResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesOrigin {
    Upstream,
    Synthetic,
}

/// Immutable output of one series request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResult {
    range: TimeRange,
    origin: SeriesOrigin,
    records: Vec<CandlestickRecord>,
    current_price: f64,
}

impl SeriesResult {
    /// `None` for an empty sequence: a result always has a last close.
    pub fn new(
        range: TimeRange,
        origin: SeriesOrigin,
        records: Vec<CandlestickRecord>,
    ) -> Option<Self> {
        let current_price = records.last()?.close;
        Some(Self { range, origin, records, current_price })
    }

    /// One-record series; the infallible path for fallback construction.
    pub fn single(range: TimeRange, origin: SeriesOrigin, record: CandlestickRecord) -> Self {
        let current_price = record.close;
        Self { range, origin, records: vec![record], current_price }
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn origin(&self) -> SeriesOrigin {
        self.origin
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == SeriesOrigin::Synthetic
    }

    pub fn records(&self) -> &[CandlestickRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept alongside `len` for the usual pairing.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Lowest low and highest high across the series.
    pub fn price_range(&self) -> (f64, f64) {
        self.records.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.low), hi.max(r.high))
        })
    }
}
