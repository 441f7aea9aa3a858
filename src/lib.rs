use wasm_bindgen::prelude::*;

use crate::domain::logging::{LogComponent, init_time_provider};
use crate::infrastructure::services::BrowserTimeProvider;

#[macro_use]
mod macros;

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;

/// Module start hook: panic messages to the console and the browser clock.
/// The logger is installed by the first `PriceSeriesApi`, which knows the
/// configured level.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();
    init_time_provider(Box::new(BrowserTimeProvider::new()));

    log_debug!(LogComponent::Presentation("Initialize"), "Module initialized");
}
