pub mod coingecko_rest_client;

pub use coingecko_rest_client::CoinGeckoRestClient;
