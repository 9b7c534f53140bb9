use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use crate::models::portfolio::WalletBalance;
use crate::models::token::TokenBalance;
use crate::models::transfer::TransferRecord;
use crate::traits::portfolio_store::PortfolioStore;

/// Publishes to every target in insertion order. The first failing target
/// aborts the call; later targets are not written.
#[derive(Default)]
pub struct CompositeStore {
    targets: Vec<Arc<dyn PortfolioStore>>,
}

impl CompositeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `target` and return the composite
    pub fn with(mut self, target: Arc<dyn PortfolioStore>) -> Self {
        self.push(target);
        self
    }

    pub fn push(&mut self, target: Arc<dyn PortfolioStore>) {
        self.targets.push(target);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<Arc<dyn PortfolioStore>> for CompositeStore {
    fn from_iter<I: IntoIterator<Item = Arc<dyn PortfolioStore>>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl PortfolioStore for CompositeStore {
    async fn save_wallet_balance(
        &self,
        balance: &WalletBalance,
        assets: &[TokenBalance],
    ) -> anyhow::Result<()> {
        for (i, target) in self.targets.iter().enumerate() {
            target
                .save_wallet_balance(balance, assets)
                .await
                .with_context(|| format!("store #{} rejected balance", i))?;
        }
        Ok(())
    }

    async fn upsert_transactions(
        &self,
        address: &str,
        transactions: &[TransferRecord],
    ) -> anyhow::Result<()> {
        for (i, target) in self.targets.iter().enumerate() {
            target
                .upsert_transactions(address, transactions)
                .await
                .with_context(|| format!("store #{} rejected transactions", i))?;
        }
        Ok(())
    }
}
