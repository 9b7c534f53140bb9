use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use crate::aggregator::wallet_sync::DEFAULT_SYNC_TX_LIMIT;

/// Runtime settings, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub alchemy_api_key: String,
    pub coingecko_api_key: String,
    pub redis_url: Option<String>,
    pub price_timeout: Duration,
    pub provider_timeout: Duration,
    pub cache_timeout: Duration,
    pub metadata_concurrency: usize,
    pub wallet_addresses: Vec<String>,
    pub tx_limit: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let alchemy_api_key =
            std::env::var("ALCHEMY_API_KEY").context("ALCHEMY_API_KEY must be set")?;

        let wallet_addresses = std::env::var("WALLET_ADDRESS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            alchemy_api_key,
            coingecko_api_key: std::env::var("COINGECKO_API_KEY").unwrap_or_default(),
            redis_url: std::env::var("REDIS_URL").ok().filter(|s| !s.is_empty()),
            price_timeout: Duration::from_secs(env_or("PRICE_TIMEOUT_SECS", 5)?),
            provider_timeout: Duration::from_secs(env_or("PROVIDER_TIMEOUT_SECS", 10)?),
            cache_timeout: Duration::from_millis(env_or("CACHE_TIMEOUT_MS", 500)?),
            metadata_concurrency: env_or("METADATA_CONCURRENCY", 4)?,
            wallet_addresses,
            tx_limit: env_or("TX_LIMIT", DEFAULT_SYNC_TX_LIMIT)?,
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset
fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}={}: {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}
