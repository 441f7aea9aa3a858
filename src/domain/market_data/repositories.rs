use futures::future::LocalBoxFuture;
use serde_json::Value;

use crate::domain::errors::AppError;
use crate::domain::market_data::TimeRange;

/// Interface to the upstream OHLC endpoint.
///
/// The payload is returned as raw JSON because the source is untrusted; the
/// normalizer decides what survives. Single-threaded: the future is `!Send`.
pub trait OhlcSource {
    fn fetch_ohlc(&self, range: TimeRange) -> LocalBoxFuture<'_, Result<Value, AppError>>;
}

impl<S: OhlcSource + ?Sized> OhlcSource for std::rc::Rc<S> {
    fn fetch_ohlc(&self, range: TimeRange) -> LocalBoxFuture<'_, Result<Value, AppError>> {
        (**self).fetch_ohlc(range)
    }
}
