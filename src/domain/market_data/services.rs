use serde_json::Value;

use crate::domain::logging::LogComponent;
use crate::domain::market_data::{CandlestickRecord, TimeRange, Timestamp};
use crate::time_utils::format_time_label;

/// Number of fields in an upstream OHLC tuple: `[timestamp_ms, open, high, low, close]`.
pub const OHLC_TUPLE_LEN: usize = 5;

/// Domain service turning untrusted OHLC payloads into chart records.
///
/// Malformed entries are dropped silently, as is any entry whose timestamp is
/// not strictly after the last accepted one. The output keeps input order and
/// may be empty.
#[derive(Debug, Clone, Copy)]
pub struct SeriesNormalizer {
    range: TimeRange,
}

impl SeriesNormalizer {
    pub fn new(range: TimeRange) -> Self {
        Self { range }
    }

    /// Normalize a whole payload. Anything other than a JSON array yields no records.
    pub fn normalize_payload(&self, payload: &Value) -> Vec<CandlestickRecord> {
        match payload.as_array() {
            Some(entries) => self.normalize_entries(entries),
            None => {
                crate::log_debug!(
                    LogComponent::Domain("Normalizer"),
                    "Payload is not an array, nothing to normalize"
                );
                Vec::new()
            }
        }
    }

    pub fn normalize_entries(&self, entries: &[Value]) -> Vec<CandlestickRecord> {
        let mut records: Vec<CandlestickRecord> = Vec::with_capacity(entries.len());
        for record in entries.iter().filter_map(|entry| self.parse_entry(entry)) {
            if records.last().is_some_and(|last| record.timestamp() <= last.timestamp()) {
                continue;
            }
            records.push(record);
        }

        let dropped = entries.len() - records.len();
        if dropped > 0 {
            crate::log_debug!(
                LogComponent::Domain("Normalizer"),
                "Dropped {} of {} upstream entries",
                dropped,
                entries.len()
            );
        }
        records
    }

    /// Accept a single `[timestamp_ms, open, high, low, close]` tuple.
    pub fn parse_entry(&self, entry: &Value) -> Option<CandlestickRecord> {
        let fields = entry.as_array()?;
        if fields.len() != OHLC_TUPLE_LEN {
            return None;
        }

        let mut numbers = [0.0f64; OHLC_TUPLE_LEN];
        for (slot, field) in numbers.iter_mut().zip(fields) {
            *slot = finite_number(field)?;
        }
        let [timestamp, open, high, low, close] = numbers;
        if timestamp < 0.0 {
            return None;
        }

        let timestamp = Timestamp::from_millis(timestamp as u64);
        let label = format_time_label(timestamp.value(), self.range);
        CandlestickRecord::from_ohlc(timestamp, label, open, high, low, close)
    }
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}
