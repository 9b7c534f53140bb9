//! Data models for the portfolio aggregator

pub mod chain;
pub mod portfolio;
pub mod price;
pub mod token;
pub mod transfer;

// Re-export for convenience
pub use chain::{ChainDescriptor, SupportedChain};
pub use portfolio::WalletBalance;
pub use price::{PriceTable, FALLBACK_PRICES};
pub use token::{RawTokenBalance, TokenBalance, TokenMetadata, NATIVE_TOKEN_ADDRESS};
pub use transfer::{
    AssetTransfer, TransferCategory, TransferDirection, TransferRecord, TransferStatus,
    TransferType,
};
