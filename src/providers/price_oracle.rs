use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::cache::Cache;
use crate::error::PriceFeedError;
use crate::models::price::{PriceTable, FALLBACK_PRICES};
use crate::traits::price_provider::PriceFeed;

/// How long a fetched price table is served from cache
pub const PRICE_TTL_SECS: u64 = 300;

/// Cache-backed price lookup with a static fallback
pub struct PriceOracle {
    feed: Arc<dyn PriceFeed>,
    cache: Cache,
}

impl PriceOracle {
    /// Create a new price oracle
    pub fn new(feed: Arc<dyn PriceFeed>, cache: Cache) -> Self {
        Self { feed, cache }
    }

    fn cache_key(symbols: &[&str]) -> String {
        let sorted: BTreeSet<&str> = symbols.iter().copied().collect();
        format!(
            "prices:{}",
            sorted.into_iter().collect::<Vec<_>>().join(",")
        )
    }

    /// USD prices for (at least) every known symbol. Never fails: when the
    /// live source is unavailable the fallback table is returned.
    pub async fn get_prices(&self, symbols: &[&str]) -> PriceTable {
        let key = Self::cache_key(symbols);

        if let Some(cached) = self.cache.get::<PriceTable>(&key).await {
            debug!("Using cached prices for {}", key);
            return cached;
        }

        match self.feed.fetch_usd_prices().await {
            Ok(live) => {
                let prices = Self::fill_known(&live);
                debug!("Fetched {} live prices", prices.len());
                self.cache.set(&key, &prices, PRICE_TTL_SECS).await;
                prices
            }
            Err(PriceFeedError::RateLimited) => {
                warn!("Price API rate limit hit, using fallback prices");
                PriceTable::fallback()
            }
            Err(e) => {
                error!("Error fetching token prices: {}", e);
                PriceTable::fallback()
            }
        }
    }

    /// Price of a single symbol
    pub async fn get_price(&self, symbol: &str) -> f64 {
        self.get_prices(&[symbol]).await.price_of(symbol)
    }

    /// Every known symbol, taking the fallback where the live table has no
    /// usable price
    fn fill_known(live: &PriceTable) -> PriceTable {
        FALLBACK_PRICES
            .iter()
            .map(|(symbol, fallback)| {
                let price = match live.price_of(symbol) {
                    p if p > 0.0 => p,
                    _ => *fallback,
                };
                (symbol.to_string(), price)
            })
            .collect()
    }
}
