use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ChartConfig;
use crate::domain::{
    events::{SeriesEvent, SeriesEventDispatcher, SeriesObserver},
    logging::{LogComponent, get_time_provider},
    market_data::{
        CandlestickRecord, OhlcSource, SeriesNormalizer, SeriesOrigin, SeriesResult,
        SyntheticSeriesGenerator, TimeRange, Timestamp,
    },
};
use crate::time_utils::format_time_label;

/// Where the provider is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    Idle,
    Loading,
    Ready,
    ReadyFallback,
}

#[derive(Debug, Default)]
struct Slot {
    next_request_id: u64,
    active: Option<(u64, TimeRange)>,
    loading: bool,
    current: Option<Rc<SeriesResult>>,
}

impl Slot {
    fn active_id(&self) -> Option<u64> {
        self.active.map(|(id, _)| id)
    }
}

struct Shared {
    slot: RefCell<Slot>,
    dispatcher: RefCell<SeriesEventDispatcher>,
}

impl Shared {
    /// Never called while `slot` is borrowed, so observers may query the provider.
    fn publish(&self, event: SeriesEvent) {
        self.dispatcher.borrow().publish(&event);
    }
}

/// Clears the loading flag when the request that set it ends, on every exit
/// path including the request future being dropped mid-flight.
struct LoadingGuard {
    shared: Rc<Shared>,
    request_id: u64,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let cleared = {
            let mut slot = self.shared.slot.borrow_mut();
            if slot.loading && slot.active_id() == Some(self.request_id) {
                slot.loading = false;
                true
            } else {
                false
            }
        };
        if cleared {
            self.shared.publish(SeriesEvent::LoadingChanged { loading: false });
        }
    }
}

/// Use case: turn a time-range selection into a renderable series.
///
/// Upstream failures and empty payloads are answered with a synthetic series;
/// the latest request always owns the current-result slot.
pub struct SeriesProvider<S: OhlcSource> {
    source: S,
    generator: SyntheticSeriesGenerator,
    shared: Rc<Shared>,
}

impl<S: OhlcSource> SeriesProvider<S> {
    pub fn new(source: S) -> Self {
        Self::with_generator(source, SyntheticSeriesGenerator::default())
    }

    pub fn with_generator(source: S, generator: SyntheticSeriesGenerator) -> Self {
        Self {
            source,
            generator,
            shared: Rc::new(Shared {
                slot: RefCell::new(Slot::default()),
                dispatcher: RefCell::new(SeriesEventDispatcher::new()),
            }),
        }
    }

    pub fn from_config(source: S, config: &ChartConfig) -> Self {
        Self::with_generator(source, SyntheticSeriesGenerator::new(config.synthetic_base_price))
    }

    pub fn subscribe(&self, observer: Rc<dyn SeriesObserver>) {
        self.shared.dispatcher.borrow_mut().subscribe(observer);
    }

    /// Fetch, validate and publish the series for `range`. Never fails.
    ///
    /// The returned value is this request's own result; it is only committed
    /// as the current series if no newer request was issued meanwhile.
    pub async fn request_series(&self, range: TimeRange) -> Rc<SeriesResult> {
        let request_id = self.begin_request(range);
        let guard = LoadingGuard { shared: Rc::clone(&self.shared), request_id };

        let series = Rc::new(self.resolve(range).await);
        self.commit(request_id, &series);

        drop(guard);
        series
    }

    fn begin_request(&self, range: TimeRange) -> u64 {
        let (request_id, became_loading) = {
            let mut slot = self.shared.slot.borrow_mut();
            slot.next_request_id += 1;
            let request_id = slot.next_request_id;
            slot.active = Some((request_id, range));
            let became_loading = !slot.loading;
            slot.loading = true;
            (request_id, became_loading)
        };

        crate::log_debug!(
            LogComponent::Application("SeriesProvider"),
            "Request #{} for {} day(s)",
            request_id,
            range.days()
        );
        if became_loading {
            self.shared.publish(SeriesEvent::LoadingChanged { loading: true });
        }
        request_id
    }

    async fn resolve(&self, range: TimeRange) -> SeriesResult {
        match self.source.fetch_ohlc(range).await {
            Ok(payload) => {
                let records = SeriesNormalizer::new(range).normalize_payload(&payload);
                match SeriesResult::new(range, SeriesOrigin::Upstream, records) {
                    Some(series) => {
                        crate::log_info!(
                            LogComponent::Application("SeriesProvider"),
                            "Loaded {} upstream candles for {} day(s)",
                            series.len(),
                            range.days()
                        );
                        series
                    }
                    None => {
                        crate::log_warn!(
                            LogComponent::Application("SeriesProvider"),
                            "No valid upstream data for {} day(s), using synthetic series",
                            range.days()
                        );
                        self.synthetic_series(range)
                    }
                }
            }
            Err(err) => {
                crate::log_warn!(
                    LogComponent::Application("SeriesProvider"),
                    "Upstream fetch failed ({}), using synthetic series",
                    err
                );
                self.synthetic_series(range)
            }
        }
    }

    /// Synthetic series for `range` ending now.
    pub fn synthetic_series(&self, range: TimeRange) -> SeriesResult {
        let end = Timestamp::from_millis(get_time_provider().current_timestamp());
        let records = self.generator.generate_for_range(range, end, &mut rand::thread_rng());
        SeriesResult::new(range, SeriesOrigin::Synthetic, records).unwrap_or_else(|| {
            let label = format_time_label(end.value(), range);
            let flat = CandlestickRecord::flat(end, label, self.generator.base_price());
            SeriesResult::single(range, SeriesOrigin::Synthetic, flat)
        })
    }

    fn commit(&self, request_id: u64, series: &Rc<SeriesResult>) {
        let active_request_id = {
            let mut slot = self.shared.slot.borrow_mut();
            let active_id = slot.active_id().unwrap_or(0);
            if active_id == request_id {
                slot.current = Some(Rc::clone(series));
            }
            active_id
        };

        if active_request_id == request_id {
            self.shared.publish(SeriesEvent::SeriesReady { request_id, series: Rc::clone(series) });
        } else {
            crate::log_info!(
                LogComponent::Application("SeriesProvider"),
                "Discarding stale result #{} ({} day(s)); #{} is active",
                request_id,
                series.range().days(),
                active_request_id
            );
            self.shared.publish(SeriesEvent::StaleResultDiscarded {
                request_id,
                range: series.range(),
                active_request_id,
            });
        }
    }

    pub fn current(&self) -> Option<Rc<SeriesResult>> {
        self.shared.slot.borrow().current.clone()
    }

    pub fn current_price(&self) -> Option<f64> {
        self.shared.slot.borrow().current.as_ref().map(|s| s.current_price())
    }

    pub fn is_loading(&self) -> bool {
        self.shared.slot.borrow().loading
    }

    /// Range of the most recently issued request.
    pub fn active_range(&self) -> Option<TimeRange> {
        self.shared.slot.borrow().active.map(|(_, range)| range)
    }

    pub fn state(&self) -> ProviderState {
        let slot = self.shared.slot.borrow();
        if slot.loading {
            return ProviderState::Loading;
        }
        match &slot.current {
            None => ProviderState::Idle,
            Some(series) if series.is_fallback() => ProviderState::ReadyFallback,
            Some(_) => ProviderState::Ready,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::AppError;
    use futures::executor::block_on;
    use futures::future::{LocalBoxFuture, ready};
    use serde_json::{Value, json};
    use std::cell::Cell;

    struct FixedSource {
        response: Result<Value, AppError>,
        calls: Cell<u32>,
    }

    impl FixedSource {
        fn new(response: Result<Value, AppError>) -> Self {
            Self { response, calls: Cell::new(0) }
        }
    }

    impl OhlcSource for FixedSource {
        fn fetch_ohlc(&self, _range: TimeRange) -> LocalBoxFuture<'_, Result<Value, AppError>> {
            self.calls.set(self.calls.get() + 1);
            Box::pin(ready(self.response.clone()))
        }
    }

    #[derive(Default)]
    struct EventLog(RefCell<Vec<String>>);

    impl SeriesObserver for EventLog {
        fn on_series_event(&self, event: &SeriesEvent) {
            let line = match event {
                SeriesEvent::LoadingChanged { loading } => format!("loading={loading}"),
                SeriesEvent::SeriesReady { request_id, .. } => format!("ready#{request_id}"),
                SeriesEvent::StaleResultDiscarded { request_id, .. } => format!("stale#{request_id}"),
            };
            self.0.borrow_mut().push(line);
        }
    }

    #[test]
    fn upstream_data_is_used_as_is() {
        let source = FixedSource::new(Ok(json!([
            [1700000000000u64, 60000, 61000, 59500, 60500],
            [1700086400000u64, 60500, 60800, 59000, 59200]
        ])));
        let provider = SeriesProvider::new(source);
        assert_eq!(provider.state(), ProviderState::Idle);

        let series = block_on(provider.request_series(TimeRange::SevenDays));
        assert_eq!(series.origin(), SeriesOrigin::Upstream);
        assert_eq!(series.len(), 2);
        assert_eq!(series.current_price(), 59200.0);
        assert_eq!(provider.current_price(), Some(59200.0));
        assert_eq!(provider.state(), ProviderState::Ready);
        assert_eq!(provider.source().calls.get(), 1);
    }

    #[test]
    fn fetch_error_falls_back_to_synthetic() {
        let provider = SeriesProvider::new(FixedSource::new(Err(AppError::HttpStatus(500))));
        let series = block_on(provider.request_series(TimeRange::ThirtyDays));
        assert!(series.is_fallback());
        assert_eq!(series.len(), 31);
        assert_eq!(provider.state(), ProviderState::ReadyFallback);
        assert!(!provider.is_loading());
    }

    #[test]
    fn empty_payload_falls_back_with_last_synthetic_close() {
        let provider = SeriesProvider::new(FixedSource::new(Ok(json!([]))));
        let series = block_on(provider.request_series(TimeRange::OneDay));
        assert!(series.is_fallback());
        assert_eq!(series.len(), 2);
        let last_close = series.records().last().map(|r| r.close());
        assert_eq!(Some(series.current_price()), last_close);
    }

    #[test]
    fn all_invalid_payload_falls_back() {
        let provider = SeriesProvider::new(FixedSource::new(Ok(json!([["a", "b"], [1, 2, 3, 4]]))));
        let series = block_on(provider.request_series(TimeRange::SevenDays));
        assert!(series.is_fallback());
        assert_eq!(series.len(), 8);
    }

    #[test]
    fn configured_base_price_seeds_the_fallback() {
        let config = ChartConfig { synthetic_base_price: 100.0, ..ChartConfig::default() };
        let provider =
            SeriesProvider::from_config(FixedSource::new(Err(AppError::Timeout(10))), &config);
        let series = block_on(provider.request_series(TimeRange::OneDay));
        let first_open = series.records()[0].open();
        assert!((98.0..=102.0).contains(&first_open));
    }

    #[test]
    fn observers_see_loading_then_ready_then_idle() {
        let provider = SeriesProvider::new(FixedSource::new(Ok(json!([[1, 1.0, 2.0, 0.5, 1.5]]))));
        let log = Rc::new(EventLog::default());
        provider.subscribe(log.clone());

        block_on(provider.request_series(TimeRange::SevenDays));
        assert_eq!(*log.0.borrow(), vec!["loading=true", "ready#1", "loading=false"]);
    }

    struct NeverSource;

    impl OhlcSource for NeverSource {
        fn fetch_ohlc(&self, _range: TimeRange) -> LocalBoxFuture<'_, Result<Value, AppError>> {
            Box::pin(futures::future::pending())
        }
    }

    #[test]
    fn dropped_request_releases_loading() {
        let provider = SeriesProvider::new(NeverSource);
        {
            let mut fut = Box::pin(provider.request_series(TimeRange::SevenDays));
            assert!(futures::FutureExt::now_or_never(fut.as_mut()).is_none());
            assert!(provider.is_loading());
            assert_eq!(provider.active_range(), Some(TimeRange::SevenDays));
        }
        assert!(!provider.is_loading());
        assert_eq!(provider.state(), ProviderState::Idle);
    }
}
