use std::sync::Arc;

use anyhow::Context;
use futures_util::future::join_all;
use tracing::{error, info};

use super::{BalanceAggregator, TransactionAggregator};
use crate::traits::portfolio_store::PortfolioStore;

/// Holdings published per wallet, highest value first
pub const MAX_STORED_ASSETS: usize = 50;

pub const DEFAULT_SYNC_TX_LIMIT: usize = 20;

/// Outcome of one wallet sync
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub address: String,
    pub total_value_usd: f64,
    pub assets_saved: usize,
    pub transactions_saved: usize,
}

/// Recomputes a wallet from chain data and publishes it to storage
pub struct WalletSync {
    balances: Arc<BalanceAggregator>,
    transactions: Arc<TransactionAggregator>,
    store: Arc<dyn PortfolioStore>,
    tx_limit: usize,
}

impl WalletSync {
    /// Create a new wallet sync service
    pub fn new(
        balances: Arc<BalanceAggregator>,
        transactions: Arc<TransactionAggregator>,
        store: Arc<dyn PortfolioStore>,
    ) -> Self {
        Self {
            balances,
            transactions,
            store,
            tx_limit: DEFAULT_SYNC_TX_LIMIT,
        }
    }

    /// Number of transfers fetched per sync
    pub fn with_tx_limit(mut self, tx_limit: usize) -> Self {
        self.tx_limit = tx_limit;
        self
    }

    /// Sync one wallet. Aggregation degrades instead of failing; only
    /// storage errors are returned.
    pub async fn sync(&self, address: &str) -> anyhow::Result<SyncReport> {
        info!("Syncing wallet {}...", address);

        let balance = self.balances.fetch_wallet_balance(address).await;
        let assets = balance.top_tokens(MAX_STORED_ASSETS);
        self.store
            .save_wallet_balance(&balance, assets)
            .await
            .with_context(|| format!("Failed to save balance for {}", address))?;
        info!(
            "Saved {} assets (total portfolio value: ${:.2})",
            assets.len(),
            balance.total_value_usd
        );

        let transactions = self
            .transactions
            .fetch_transaction_history(address, self.tx_limit)
            .await;
        self.store
            .upsert_transactions(address, &transactions)
            .await
            .with_context(|| format!("Failed to save transactions for {}", address))?;

        info!("Wallet {} synced successfully", address);
        Ok(SyncReport {
            address: address.to_string(),
            total_value_usd: balance.total_value_usd,
            assets_saved: assets.len(),
            transactions_saved: transactions.len(),
        })
    }

    /// Sync several wallets concurrently; each result is independent
    pub async fn sync_all(&self, addresses: &[String]) -> Vec<anyhow::Result<SyncReport>> {
        let results = join_all(addresses.iter().map(|address| self.sync(address))).await;
        for (address, result) in addresses.iter().zip(&results) {
            if let Err(e) = result {
                error!("Error syncing wallet {}: {:#}", address, e);
            }
        }
        results
    }
}
