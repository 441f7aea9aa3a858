//! Logger and clock implementations installed behind the domain traits.

use std::sync::Mutex;

use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};
use crate::time_utils::format_log_time;

/// Console logger: browser console on wasm32, stderr elsewhere.
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn new_production() -> Self {
        Self::new(LogLevel::Info)
    }

    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if !self.enabled(entry.level) {
            return;
        }
        let formatted = entry.formatted();

        #[cfg(target_arch = "wasm32")]
        {
            let line = wasm_bindgen::JsValue::from(formatted);
            match entry.level {
                LogLevel::Trace | LogLevel::Debug => web_sys::console::debug_1(&line),
                LogLevel::Info => web_sys::console::info_1(&line),
                LogLevel::Warn => web_sys::console::warn_1(&line),
                LogLevel::Error => web_sys::console::error_1(&line),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{formatted}");
    }
}

/// Keeps formatted entries in memory; used by tests and by hosts that want
/// to read the log back.
#[derive(Default)]
pub struct MemoryLogger {
    min_level: Option<LogLevel>,
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self { min_level: Some(min_level), lines: Mutex::new(Vec::new()) }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, entry: LogEntry) {
        if self.min_level.is_some_and(|min| entry.level < min) {
            return;
        }
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(entry.formatted());
        }
    }
}

/// `Date.now()` based clock.
#[derive(Default)]
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for BrowserTimeProvider {
    fn current_timestamp(&self) -> u64 {
        #[cfg(target_arch = "wasm32")]
        {
            js_sys::Date::now() as u64
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            crate::domain::logging::SystemTimeProvider.current_timestamp()
        }
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        format_log_time(timestamp)
    }
}

/// Clock pinned to one instant, for deterministic labels in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeProvider(pub u64);

impl TimeProvider for FixedTimeProvider {
    fn current_timestamp(&self) -> u64 {
        self.0
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        format_log_time(timestamp)
    }
}
