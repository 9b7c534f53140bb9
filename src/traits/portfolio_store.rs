use async_trait::async_trait;

use crate::models::portfolio::WalletBalance;
use crate::models::token::TokenBalance;
use crate::models::transfer::TransferRecord;

/// Durable storage the aggregated results are published to
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Replace the stored assets of a wallet and update its total value
    async fn save_wallet_balance(
        &self,
        balance: &WalletBalance,
        assets: &[TokenBalance],
    ) -> anyhow::Result<()>;

    /// Insert transfers not yet stored, keyed by hash
    async fn upsert_transactions(
        &self,
        address: &str,
        transactions: &[TransferRecord],
    ) -> anyhow::Result<()>;
}
