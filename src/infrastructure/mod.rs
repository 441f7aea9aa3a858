//! Browser-facing adapters: HTTP source, canvas surface, logger and clock.

pub mod http;
pub mod rendering;
pub mod services;
