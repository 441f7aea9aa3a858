//! Runtime configuration handed over by the host page as JSON.

use serde::Deserialize;

use crate::domain::errors::AppError;
use crate::domain::logging::LogLevel;
use crate::domain::market_data::{DEFAULT_BASE_PRICE, TimeRange};

pub const DEFAULT_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_COIN_ID: &str = "bitcoin";
pub const DEFAULT_VS_CURRENCY: &str = "usd";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 10_000;

/// Root configuration. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub api_base_url: String,
    pub coin_id: String,
    pub vs_currency: String,
    pub request_timeout_ms: u32,
    pub synthetic_base_price: f64,
    pub default_range: TimeRange,
    pub min_log_level: LogLevel,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            coin_id: DEFAULT_COIN_ID.to_string(),
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            synthetic_base_price: DEFAULT_BASE_PRICE,
            default_range: TimeRange::default(),
            min_log_level: LogLevel::Info,
        }
    }
}

impl ChartConfig {
    /// Parse and validate a JSON object.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let config: ChartConfig = serde_json::from_str(json)
            .map_err(|e| AppError::ConfigError(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.api_base_url.trim().is_empty() {
            return Err(AppError::ConfigError("apiBaseUrl is empty".into()));
        }
        if self.coin_id.trim().is_empty() {
            return Err(AppError::ConfigError("coinId is empty".into()));
        }
        if self.vs_currency.trim().is_empty() {
            return Err(AppError::ConfigError("vsCurrency is empty".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(AppError::ConfigError("requestTimeoutMs must be positive".into()));
        }
        if !(self.synthetic_base_price.is_finite() && self.synthetic_base_price > 0.0) {
            return Err(AppError::ConfigError(
                "syntheticBasePrice must be a positive number".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(ChartConfig::from_json("{}"), Ok(ChartConfig::default()));
    }

    #[test]
    fn overrides_are_applied() {
        let config = ChartConfig::from_json(
            r#"{"coinId":"ethereum","requestTimeoutMs":2500,"defaultRange":"30","minLogLevel":"debug"}"#,
        )
        .expect("valid config");
        assert_eq!(config.coin_id, "ethereum");
        assert_eq!(config.request_timeout_ms, 2500);
        assert_eq!(config.default_range, TimeRange::ThirtyDays);
        assert_eq!(config.min_log_level, LogLevel::Debug);
        assert_eq!(config.vs_currency, DEFAULT_VS_CURRENCY);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            ChartConfig::from_json(r#"{"coinId":"  "}"#),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            ChartConfig::from_json(r#"{"requestTimeoutMs":0}"#),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            ChartConfig::from_json(r#"{"syntheticBasePrice":-1}"#),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(ChartConfig::from_json("not json"), Err(AppError::ConfigError(_))));
    }
}
