//! Data and price providers

pub mod alchemy_provider;
pub mod coingecko_feed;
pub mod price_oracle;

#[cfg(test)]
pub(crate) mod test_http;

// Re-export for convenience
pub use alchemy_provider::AlchemyProvider;
pub use coingecko_feed::CoinGeckoFeed;
pub use price_oracle::PriceOracle;
