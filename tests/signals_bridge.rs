use std::rc::Rc;

use futures::executor::block_on;
use futures::future::{LocalBoxFuture, ready};
use leptos::*;
use price_series_wasm::application::SeriesProvider;
use price_series_wasm::domain::errors::AppError;
use price_series_wasm::domain::market_data::{OhlcSource, TimeRange};
use price_series_wasm::presentation::signals::SeriesSignals;
use serde_json::{Value, json};

struct OneCandle;

impl OhlcSource for OneCandle {
    fn fetch_ohlc(&self, _range: TimeRange) -> LocalBoxFuture<'_, Result<Value, AppError>> {
        Box::pin(ready(Ok(json!([[1700000000000u64, 62000, 62600, 61900, 62512.3]]))))
    }
}

#[test]
fn provider_updates_flow_into_signals() {
    let runtime = create_runtime();
    let signals = SeriesSignals::new();
    let provider = SeriesProvider::new(OneCandle);
    provider.subscribe(Rc::new(signals));

    signals.select_range(TimeRange::OneDay);
    assert_eq!(signals.time_range.get_untracked(), TimeRange::OneDay);
    assert_eq!(signals.price_caption().get_untracked(), "Loading price data...");

    block_on(provider.request_series(TimeRange::OneDay));

    assert!(!signals.loading.get_untracked());
    assert!(!signals.is_fallback.get_untracked());
    assert_eq!(signals.current_price.get_untracked(), Some(62512.3));
    assert_eq!(signals.price_caption().get_untracked(), "Current price: $62,512.3");
    assert_eq!(signals.series.get_untracked().map(|s| s.len()), Some(1));
    runtime.dispose();
}

#[test]
fn fallback_is_visible_to_the_view() {
    struct Down;
    impl OhlcSource for Down {
        fn fetch_ohlc(&self, _range: TimeRange) -> LocalBoxFuture<'_, Result<Value, AppError>> {
            Box::pin(ready(Err(AppError::NetworkError("offline".into()))))
        }
    }

    let runtime = create_runtime();
    let signals = SeriesSignals::new();
    let provider = SeriesProvider::new(Down);
    provider.subscribe(Rc::new(signals));

    block_on(provider.request_series(TimeRange::SevenDays));

    assert!(signals.is_fallback.get_untracked());
    assert_eq!(signals.series.get_untracked().map(|s| s.len()), Some(8));
    assert_eq!(signals.current_price.get_untracked(), provider.current_price());
    runtime.dispose();
}
