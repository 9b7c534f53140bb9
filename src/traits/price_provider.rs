use async_trait::async_trait;

use crate::error::PriceFeedError;
use crate::models::price::PriceTable;

/// Trait for live price sources
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetch USD prices for the feed's fixed set of known symbols.
    /// Symbols the source did not report are absent from the table.
    async fn fetch_usd_prices(&self) -> Result<PriceTable, PriceFeedError>;
}
