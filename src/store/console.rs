use async_trait::async_trait;
use tracing::info;

use crate::models::portfolio::WalletBalance;
use crate::models::token::TokenBalance;
use crate::models::transfer::TransferRecord;
use crate::traits::portfolio_store::PortfolioStore;

/// Store that logs published results instead of persisting them
pub struct ConsoleStore;

impl ConsoleStore {
    /// Create a new console store
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PortfolioStore for ConsoleStore {
    async fn save_wallet_balance(
        &self,
        balance: &WalletBalance,
        assets: &[TokenBalance],
    ) -> anyhow::Result<()> {
        info!("{}", "=".repeat(80));
        info!("PORTFOLIO SNAPSHOT");
        info!("{}", "=".repeat(80));
        info!("Wallet Address: {}", balance.address);
        info!(
            "Timestamp: {}",
            balance.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
        );

        if assets.is_empty() {
            info!("No token holdings found in wallet");
        } else {
            info!("");
            info!("TOKEN HOLDINGS:");
            info!("{}", "-".repeat(80));
        }

        for (i, asset) in assets.iter().enumerate() {
            info!("{}. {} ({})", i + 1, asset.symbol, asset.name);
            info!("   Contract: {}", asset.token_address);
            info!("   Balance: {} (decimals: {})", asset.balance, asset.decimals);
            if asset.value_usd > 0.0 {
                info!("   Value: ${:.4}", asset.value_usd);
            } else {
                info!("   Price: Not available");
            }
            info!("");
        }

        info!("{}", "-".repeat(80));
        info!("Native Balance: {}", balance.native_balance);
        info!("Native Value: ${:.2}", balance.native_value_usd);
        info!("➤ Total Portfolio Value: ${:.2}", balance.total_value_usd);
        info!("{}", "=".repeat(80));

        Ok(())
    }

    async fn upsert_transactions(
        &self,
        address: &str,
        transactions: &[TransferRecord],
    ) -> anyhow::Result<()> {
        info!("Recent transactions for {}: {}", address, transactions.len());
        info!("{}", "-".repeat(80));

        for tx in transactions {
            let indicator = match tx.tx_type {
                crate::models::transfer::TransferType::Receive => "↓",
                _ => "↑",
            };
            info!(
                "  {} {:?} {} {} (${:.2})",
                indicator, tx.tx_type, tx.amount, tx.from_token, tx.value_usd
            );
            info!("     Hash: {}", tx.hash);
            info!("     Chain: {}  Time: {}", tx.chain_id, tx.timestamp.to_rfc3339());
        }

        info!("{}", "=".repeat(80));
        Ok(())
    }
}
