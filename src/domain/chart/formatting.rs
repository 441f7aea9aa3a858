//! Text shown around the chart: header caption, axis ticks and tooltip.

use crate::domain::market_data::CandlestickRecord;

/// `$` + thousands separators + at most two fractional digits.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return "$—".to_string();
    }
    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && rounded != "0.00" { "-" } else { "" };
    if frac.is_empty() {
        format!("{}${}", sign, group_thousands(int_part))
    } else {
        format!("{}${}.{}", sign, group_thousands(int_part), frac)
    }
}

/// Whole-dollar axis tick, e.g. `$62,500`.
pub fn format_axis_tick(value: f64) -> String {
    format_price(value.round())
}

pub fn current_price_caption(current_price: Option<f64>) -> String {
    match current_price {
        Some(price) => format!("Current price: {}", format_price(price)),
        None => "Loading price data...".to_string(),
    }
}

/// Lines of the hover tooltip for one candle.
pub fn tooltip_lines(record: &CandlestickRecord) -> Vec<String> {
    vec![
        format!("Date: {}", record.label()),
        format!("Open: {}", format_price(record.open())),
        format!("High: {}", format_price(record.high())),
        format!("Low: {}", format_price(record.low())),
        format!("Close: {}", format_price(record.close())),
    ]
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
