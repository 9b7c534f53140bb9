use thiserror::Error;

/// Errors raised by a live price feed
#[derive(Error, Debug)]
pub enum PriceFeedError {
    #[error("Price API rate limit hit")]
    RateLimited,

    #[error("Price API returned status {0}")]
    Status(u16),

    #[error("Price request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Price request timed out after {0}s")]
    Timeout(u64),
}

/// Errors raised by a cache backend
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(#[from] redis::RedisError),

    #[error("Cache operation timed out")]
    Timeout,

    #[error("Cache payload error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON-RPC error object returned by a chain provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("RPC error {code}: {message}")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}
