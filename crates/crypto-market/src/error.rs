//! Error Types for Market Data

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketError>;

#[derive(Error, Debug)]
pub enum MarketError {
    /// Transport failure: unreachable host, reset connection, timeout
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Exchange answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Body was not the expected JSON shape
    #[error("Invalid response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Exchange cannot be reached at all (mock/offline mode)
    #[error("Exchange unavailable: {0}")]
    Unavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MarketError {
    /// Whether the upstream rejected the request rather than failing to answer
    pub fn is_rejection(&self) -> bool {
        matches!(self, MarketError::Api { status, .. } if (400..500).contains(status))
    }
}
