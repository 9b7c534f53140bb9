use async_trait::async_trait;
use ethers::types::U256;

use crate::models::token::{RawTokenBalance, TokenMetadata};
use crate::models::transfer::{AssetTransfer, TransferCategory, TransferDirection};

/// Core trait for fetching on-chain data for one network
#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    /// Fetch native balance (in wei) for a wallet
    async fn native_balance(&self, address: &str) -> anyhow::Result<U256>;

    /// Enumerate token holdings for a wallet. Entries may lack metadata.
    async fn token_balances(&self, address: &str) -> anyhow::Result<Vec<RawTokenBalance>>;

    /// Get symbol, name and decimals for a token contract
    async fn token_metadata(&self, contract_address: &str) -> anyhow::Result<TokenMetadata>;

    /// Fetch transfers where `address` is the sender (`Outgoing`) or recipient
    /// (`Incoming`), most recent first, at most `max_count`
    async fn transfers(
        &self,
        address: &str,
        direction: TransferDirection,
        categories: &[TransferCategory],
        max_count: u32,
    ) -> anyhow::Result<Vec<AssetTransfer>>;
}
