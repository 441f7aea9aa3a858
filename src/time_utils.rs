use chrono::{DateTime, Utc};

use crate::domain::market_data::TimeRange;

pub const MS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

fn to_utc(timestamp_ms: u64) -> Option<DateTime<Utc>> {
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

/// Format a candle timestamp for the x axis using UTC components.
///
/// - `TimeRange::OneDay` -> `MM/DD HH:MM`
/// - multi-day ranges -> `MM/DD/YYYY`
pub fn format_time_label(timestamp_ms: u64, range: TimeRange) -> String {
    let Some(date) = to_utc(timestamp_ms) else {
        return timestamp_ms.to_string();
    };
    if range.is_intraday() {
        date.format("%m/%d %H:%M").to_string()
    } else {
        date.format("%m/%d/%Y").to_string()
    }
}

/// `HH:MM:SS.mmm` for log lines.
pub fn format_log_time(timestamp_ms: u64) -> String {
    match to_utc(timestamp_ms) {
        Some(date) => date.format("%H:%M:%S%.3f").to_string(),
        None => format!("{:06}", timestamp_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_day_ranges_use_calendar_date() {
        assert_eq!(format_time_label(1_700_000_000_000, TimeRange::SevenDays), "11/14/2023");
        assert_eq!(format_time_label(0, TimeRange::ThirtyDays), "01/01/1970");
    }

    #[test]
    fn intraday_range_keeps_time_of_day() {
        assert_eq!(format_time_label(1_700_000_000_000, TimeRange::OneDay), "11/14 22:13");
    }

    #[test]
    fn out_of_range_timestamp_falls_back_to_raw_value() {
        assert_eq!(format_time_label(u64::MAX, TimeRange::SevenDays), u64::MAX.to_string());
    }

    #[test]
    fn log_time_has_millisecond_precision() {
        assert_eq!(format_log_time(1_700_000_000_123), "22:13:20.123");
    }
}
