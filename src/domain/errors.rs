use derive_more::Display;

/// Simplified error system - no over-engineering!
///
/// Transport and payload failures never leave the series provider: they are
/// answered with a synthetic series. The remaining kinds are reported by the
/// render boundary and the configuration loader.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum AppError {
    #[display(fmt = "Network Error: {}", _0)]
    NetworkError(String),
    #[display(fmt = "HTTP Error: status {}", _0)]
    HttpStatus(u16),
    #[display(fmt = "Payload Error: {}", _0)]
    PayloadError(String),
    #[display(fmt = "Timeout: no response after {} ms", _0)]
    Timeout(u32),
    #[display(fmt = "Rendering Error: {}", _0)]
    RenderingError(String),
    #[display(fmt = "Config Error: {}", _0)]
    ConfigError(String),
}

impl std::error::Error for AppError {}

// Simple convenience type aliases
pub type NetworkResult<T> = Result<T, AppError>;
pub type RenderingResult<T> = Result<T, AppError>;
