pub mod series_provider;

pub use series_provider::*;
