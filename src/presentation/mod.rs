//! Host-facing layer: wasm-bindgen API and leptos signals.

pub mod signals;
pub mod wasm_api;

pub use wasm_api::PriceSeriesApi;
