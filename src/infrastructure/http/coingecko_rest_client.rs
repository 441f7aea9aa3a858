use futures::future::{Either, LocalBoxFuture, select};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;

use crate::config::ChartConfig;
use crate::domain::errors::{AppError, NetworkResult};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{OhlcSource, TimeRange};

/// REST client for the CoinGecko `/coins/{id}/ohlc` endpoint.
#[derive(Debug, Clone)]
pub struct CoinGeckoRestClient {
    base_url: String,
    coin_id: String,
    vs_currency: String,
    timeout_ms: u32,
}

impl Default for CoinGeckoRestClient {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

impl CoinGeckoRestClient {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            coin_id: config.coin_id.clone(),
            vs_currency: config.vs_currency.clone(),
            timeout_ms: config.request_timeout_ms,
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn ohlc_url(&self, range: TimeRange) -> String {
        format!(
            "{}/coins/{}/ohlc?vs_currency={}&days={}",
            self.base_url,
            self.coin_id,
            self.vs_currency,
            range.days()
        )
    }

    /// Raw JSON body of the OHLC endpoint, bounded by the configured timeout.
    pub async fn fetch_ohlc_json(&self, range: TimeRange) -> NetworkResult<Value> {
        let url = self.ohlc_url(range);
        crate::log_debug!(LogComponent::Infrastructure("CoinGecko"), "GET {}", url);

        let request = Box::pin(Self::get_json(url));
        let timeout = TimeoutFuture::new(self.timeout_ms);

        match select(request, timeout).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                crate::log_warn!(
                    LogComponent::Infrastructure("CoinGecko"),
                    "No response after {} ms",
                    self.timeout_ms
                );
                Err(AppError::Timeout(self.timeout_ms))
            }
        }
    }

    async fn get_json(url: String) -> NetworkResult<Value> {
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("{e:?}")))?;

        if !response.ok() {
            return Err(AppError::HttpStatus(response.status()));
        }

        response.json::<Value>().await.map_err(|e| AppError::PayloadError(format!("{e:?}")))
    }
}

impl OhlcSource for CoinGeckoRestClient {
    fn fetch_ohlc(&self, range: TimeRange) -> LocalBoxFuture<'_, Result<Value, AppError>> {
        Box::pin(self.fetch_ohlc_json(range))
    }
}
