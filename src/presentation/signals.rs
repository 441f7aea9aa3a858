//! Leptos signals mirroring the series provider, for reactive host views.

use std::rc::Rc;

use leptos::*;

use crate::domain::chart::formatting::current_price_caption;
use crate::domain::events::{SeriesEvent, SeriesObserver};
use crate::domain::logging::{LogEntry, LogLevel, Logger};
use crate::domain::market_data::{SeriesResult, TimeRange};
use crate::infrastructure::services::ConsoleLogger;

/// Log lines kept in the `logs` signal.
pub const MAX_LOG_LINES: usize = 100;

/// Observable view of the provider state.
#[derive(Clone, Copy)]
pub struct SeriesSignals {
    pub series: RwSignal<Option<Rc<SeriesResult>>>,
    pub loading: RwSignal<bool>,
    pub current_price: RwSignal<Option<f64>>,
    pub time_range: RwSignal<TimeRange>,
    pub is_fallback: RwSignal<bool>,
    pub logs: RwSignal<Vec<String>>,
}

impl SeriesSignals {
    /// Signals owned by the current reactive runtime.
    pub fn new() -> Self {
        Self {
            series: create_rw_signal(None),
            loading: create_rw_signal(false),
            current_price: create_rw_signal(None),
            time_range: create_rw_signal(TimeRange::default()),
            is_fallback: create_rw_signal(false),
            logs: create_rw_signal(Vec::new()),
        }
    }

    /// Record the user's selection before its request resolves.
    pub fn select_range(&self, range: TimeRange) {
        self.time_range.set(range);
    }

    /// Header text derived from `current_price`.
    pub fn price_caption(&self) -> Signal<String> {
        let price = self.current_price;
        Signal::derive(move || current_price_caption(price.get()))
    }

    pub fn push_log(&self, line: String) {
        self.logs.update(|lines| {
            lines.push(line);
            if lines.len() > MAX_LOG_LINES {
                let excess = lines.len() - MAX_LOG_LINES;
                lines.drain(..excess);
            }
        });
    }
}

impl Default for SeriesSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesObserver for SeriesSignals {
    fn on_series_event(&self, event: &SeriesEvent) {
        match event {
            SeriesEvent::LoadingChanged { loading } => self.loading.set(*loading),
            SeriesEvent::SeriesReady { series, .. } => {
                self.current_price.set(Some(series.current_price()));
                self.time_range.set(series.range());
                self.is_fallback.set(series.is_fallback());
                self.series.set(Some(Rc::clone(series)));
            }
            SeriesEvent::StaleResultDiscarded { .. } => {}
        }
    }
}

thread_local! {
    static GLOBALS: SeriesSignals = SeriesSignals::new();
}

/// Signals shared by the wasm API and leptos components on this thread.
pub fn globals() -> SeriesSignals {
    GLOBALS.with(|signals| *signals)
}

crate::global_signals! {
    pub series_signal => series: Option<Rc<SeriesResult>>,
    pub loading_signal => loading: bool,
    pub current_price_signal => current_price: Option<f64>,
    pub time_range_signal => time_range: TimeRange,
    pub logs_signal => logs: Vec<String>,
}

/// Bridge logger: forwards to the console and mirrors lines into
/// [`logs_signal`].
pub struct LeptosLogger {
    console: ConsoleLogger,
}

impl LeptosLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { console: ConsoleLogger::new(min_level) }
    }
}

impl Logger for LeptosLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.console.min_level() {
            return;
        }
        globals().push_log(entry.formatted());
        self.console.log(entry);
    }
}
