use std::cell::RefCell;
use std::rc::Rc;

use gloo::utils::format::JsValueSerdeExt;
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::application::SeriesProvider;
use crate::config::ChartConfig;
use crate::domain::chart::{ChartRenderBoundary, FrameLayout, RenderOutcome};
use crate::domain::logging::{LogComponent, init_logger};
use crate::domain::market_data::TimeRange;
use crate::infrastructure::http::CoinGeckoRestClient;
use crate::infrastructure::rendering::CanvasSurface;
use crate::presentation::signals::{LeptosLogger, SeriesSignals, globals};

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Browser entry point: one provider, one set of signals, one render boundary.
#[wasm_bindgen]
pub struct PriceSeriesApi {
    provider: Rc<SeriesProvider<CoinGeckoRestClient>>,
    signals: SeriesSignals,
    boundary: ChartRenderBoundary,
    default_range: TimeRange,
    last_outcome: RefCell<Option<RenderOutcome>>,
}

#[wasm_bindgen]
impl PriceSeriesApi {
    /// `config_json` is an optional JSON object; missing keys take defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PriceSeriesApi, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => {
                ChartConfig::from_json(json).map_err(to_js_error)?
            }
            _ => ChartConfig::default(),
        };
        init_logger(Box::new(LeptosLogger::new(config.min_log_level)));

        let provider =
            SeriesProvider::from_config(CoinGeckoRestClient::from_config(&config), &config);
        let signals = globals();
        provider.subscribe(Rc::new(signals));

        crate::log_info!(
            LogComponent::Presentation("PriceSeriesApi"),
            "Created for {}/{} (default range {})",
            config.coin_id,
            config.vs_currency,
            config.default_range.button_label()
        );

        Ok(Self {
            provider: Rc::new(provider),
            signals,
            boundary: ChartRenderBoundary::default(),
            default_range: config.default_range,
            last_outcome: RefCell::new(None),
        })
    }

    /// Resolve with the serialized series for 1, 7 or 30 days. Never rejects
    /// for upstream failures; those resolve with a synthetic series.
    #[wasm_bindgen(js_name = requestSeries)]
    pub fn request_series(&self, days: Option<u32>) -> Promise {
        let provider = Rc::clone(&self.provider);
        let signals = self.signals;
        let range = days.map_or(Some(self.default_range), TimeRange::from_days);

        future_to_promise(async move {
            let range = range.ok_or_else(|| {
                JsValue::from_str("days must be one of 1, 7 or 30")
            })?;
            signals.select_range(range);
            let series = provider.request_series(range).await;
            JsValue::from_serde(series.as_ref()).map_err(to_js_error)
        })
    }

    #[wasm_bindgen(js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.provider.is_loading()
    }

    #[wasm_bindgen(js_name = currentPrice)]
    pub fn current_price(&self) -> Option<f64> {
        self.provider.current_price()
    }

    #[wasm_bindgen(js_name = isFallback)]
    pub fn is_fallback(&self) -> bool {
        self.provider.current().is_some_and(|series| series.is_fallback())
    }

    /// Draw the current series onto `canvas_id`. Returns `false` when the
    /// render boundary caught a failure and drew the error message instead.
    #[wasm_bindgen(js_name = renderFrame)]
    pub fn render_frame(&self, canvas_id: &str, width: u32, height: u32) -> Result<bool, JsValue> {
        let Some(series) = self.provider.current() else {
            return Ok(false);
        };
        let layout = FrameLayout::new(f64::from(width), f64::from(height));
        let mut surface =
            CanvasSurface::from_canvas_id(canvas_id, width, height).map_err(to_js_error)?;

        let outcome = self.boundary.render_series(&series, &layout, &mut surface);
        let drawn = !outcome.is_failed();
        if drawn {
            if let Some(scale) = layout.fit_scale(series.records()) {
                if let Err(err) = surface.annotate(&layout, &scale, Some(series.current_price())) {
                    crate::log_warn!(
                        LogComponent::Presentation("PriceSeriesApi"),
                        "Axis labels skipped: {}",
                        err
                    );
                }
            }
        }
        *self.last_outcome.borrow_mut() = Some(outcome);
        Ok(drawn)
    }

    /// Draw list of the last render pass as JSON, for hosts with their own
    /// drawing backend.
    #[wasm_bindgen(js_name = lastFrame)]
    pub fn last_frame(&self) -> Result<JsValue, JsValue> {
        match self.last_outcome.borrow().as_ref().and_then(RenderOutcome::frame) {
            Some(frame) => JsValue::from_serde(frame).map_err(to_js_error),
            None => Ok(JsValue::NULL),
        }
    }
}
