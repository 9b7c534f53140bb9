//! Core traits for the portfolio aggregator

pub mod cache_store;
pub mod data_provider;
pub mod portfolio_store;
pub mod price_provider;

// Re-export for convenience
pub use cache_store::CacheStore;
pub use data_provider::ChainDataProvider;
pub use portfolio_store::PortfolioStore;
pub use price_provider::PriceFeed;
