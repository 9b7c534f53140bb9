use async_trait::async_trait;

use crate::error::CacheError;

/// Key/value backend with per-key expiration
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a live value; expired keys read as `None`
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Write a value, (re)setting its TTL
    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError>;

    async fn del(&self, key: &str) -> Result<(), CacheError>;
}
