//! Multi-chain Portfolio Library
//!
//! Aggregates native and token balances and transfer history of EVM wallets
//! across several chains, prices them in USD and caches the results with
//! bounded staleness. Read-only with respect to chain state.

// Public modules - these are the API surface
pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod store;
pub mod traits;
pub mod utils;

// Re-export commonly used items for easier access
pub use aggregator::{BalanceAggregator, SyncReport, TransactionAggregator, WalletSync};
pub use cache::{Cache, MemoryCache, RedisCache};
pub use config::Config;
pub use error::{CacheError, PriceFeedError, RpcError};
pub use models::{
    chain::{ChainDescriptor, SupportedChain},
    portfolio::WalletBalance,
    price::PriceTable,
    token::TokenBalance,
    transfer::{TransferRecord, TransferType},
};
pub use providers::{AlchemyProvider, CoinGeckoFeed, PriceOracle};
pub use store::{CompositeStore, ConsoleStore};
pub use traits::{CacheStore, ChainDataProvider, PortfolioStore, PriceFeed};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for library functions
pub type Result<T> = std::result::Result<T, anyhow::Error>;
