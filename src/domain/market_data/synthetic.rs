//! Fallback candle series used whenever no trustworthy upstream data exists.

use rand::Rng;

use crate::domain::market_data::{CandlestickRecord, TimeRange, Timestamp};
use crate::time_utils::format_time_label;

pub const DEFAULT_BASE_PRICE: f64 = 62_500.0;

/// Max relative move of the open against the prior implied price.
const OPEN_DRIFT: f64 = 0.02;
/// Max relative move of the close against the open.
const CLOSE_DRIFT: f64 = 0.01;
/// Max relative wick extension beyond the body.
const WICK_JITTER: f64 = 0.01;

/// Random-walk OHLC generator. Every record it returns passes the checked
/// record constructor, so callers may rely on it unconditionally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticSeriesGenerator {
    base_price: f64,
}

impl Default for SyntheticSeriesGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PRICE)
    }
}

impl SyntheticSeriesGenerator {
    /// Non-finite or non-positive base prices fall back to [`DEFAULT_BASE_PRICE`].
    pub fn new(base_price: f64) -> Self {
        let base_price = if base_price.is_finite() && base_price > 0.0 {
            base_price
        } else {
            DEFAULT_BASE_PRICE
        };
        Self { base_price }
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    /// Exactly `range.days() + 1` daily records, the last one stamped `end`.
    pub fn generate_for_range<R: Rng + ?Sized>(
        &self,
        range: TimeRange,
        end: Timestamp,
        rng: &mut R,
    ) -> Vec<CandlestickRecord> {
        self.generate(range.days(), range, end, rng)
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        periods: u32,
        range: TimeRange,
        end: Timestamp,
        rng: &mut R,
    ) -> Vec<CandlestickRecord> {
        let mut records = Vec::with_capacity(periods as usize + 1);
        let mut implied_price = self.base_price;

        for days_back in (0..=u64::from(periods)).rev() {
            let timestamp = end.days_before(days_back);
            let label = format_time_label(timestamp.value(), range);

            let record = self
                .random_step(implied_price, timestamp, &label, rng)
                .unwrap_or_else(|| CandlestickRecord::flat(timestamp, label, self.base_price));

            implied_price = record.close();
            records.push(record);
        }
        records
    }

    fn random_step<R: Rng + ?Sized>(
        &self,
        implied_price: f64,
        timestamp: Timestamp,
        label: &str,
        rng: &mut R,
    ) -> Option<CandlestickRecord> {
        let open = implied_price * (1.0 + rng.gen_range(-OPEN_DRIFT..=OPEN_DRIFT));
        let close = open * (1.0 + rng.gen_range(-CLOSE_DRIFT..=CLOSE_DRIFT));

        let body_high = open.max(close);
        let body_low = open.min(close);
        // Clamp so rounding in the jitter can never pull a wick inside the body.
        let high = (body_high * (1.0 + rng.gen_range(0.0..=WICK_JITTER))).max(body_high);
        let low = (body_low * (1.0 - rng.gen_range(0.0..=WICK_JITTER))).min(body_low);

        if !(open > 0.0 && close > 0.0 && low > 0.0) {
            return None;
        }
        CandlestickRecord::from_ohlc(timestamp, label, open, high, low, close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::MS_PER_DAY;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use strum::IntoEnumIterator;

    const END: u64 = 1_700_000_000_000;

    #[test]
    fn produces_days_plus_one_records_for_every_range() {
        let generator = SyntheticSeriesGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);
        for range in TimeRange::iter() {
            let records = generator.generate_for_range(range, Timestamp::from_millis(END), &mut rng);
            assert_eq!(records.len(), range.days() as usize + 1);
        }
    }

    #[test]
    fn one_record_per_day_ending_at_end() {
        let generator = SyntheticSeriesGenerator::default();
        let mut rng = StdRng::seed_from_u64(1);
        let records =
            generator.generate_for_range(TimeRange::SevenDays, Timestamp::from_millis(END), &mut rng);
        assert_eq!(records.last().map(|r| r.timestamp().value()), Some(END));
        assert_eq!(records.first().map(|r| r.timestamp().value()), Some(END - 7 * MS_PER_DAY));
        for pair in records.windows(2) {
            assert_eq!(pair[1].timestamp().value() - pair[0].timestamp().value(), MS_PER_DAY);
        }
        assert_eq!(records.last().map(|r| r.label().to_string()), Some("11/14/2023".to_string()));
    }

    #[test]
    fn walk_stays_within_drift_bounds() {
        let generator = SyntheticSeriesGenerator::new(100.0);
        let mut rng = StdRng::seed_from_u64(99);
        let records =
            generator.generate(365, TimeRange::ThirtyDays, Timestamp::from_millis(END), &mut rng);
        let mut implied = 100.0;
        for r in &records {
            assert!((r.open() / implied - 1.0).abs() <= OPEN_DRIFT + 1e-12);
            assert!((r.close() / r.open() - 1.0).abs() <= CLOSE_DRIFT + 1e-12);
            assert!(r.low() <= r.body_low() && r.body_high() <= r.high());
            implied = r.close();
        }
    }

    #[test]
    fn zero_periods_still_yields_one_record() {
        let generator = SyntheticSeriesGenerator::default();
        let records = generator.generate(
            0,
            TimeRange::OneDay,
            Timestamp::from_millis(END),
            &mut StdRng::seed_from_u64(3),
        );
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn invalid_base_price_uses_default() {
        assert_eq!(SyntheticSeriesGenerator::new(f64::NAN).base_price(), DEFAULT_BASE_PRICE);
        assert_eq!(SyntheticSeriesGenerator::new(-5.0).base_price(), DEFAULT_BASE_PRICE);
        assert_eq!(SyntheticSeriesGenerator::new(1_000.0).base_price(), 1_000.0);
    }
}
