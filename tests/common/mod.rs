#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ethers::types::U256;

use multichain_portfolio::error::PriceFeedError;
use multichain_portfolio::models::token::{RawTokenBalance, TokenMetadata};
use multichain_portfolio::models::transfer::{
    AssetTransfer, TransferCategory, TransferDirection, TransferMetadata,
};
use multichain_portfolio::{
    Cache, ChainDataProvider, ChainDescriptor, PortfolioStore, PriceFeed, PriceOracle, PriceTable,
    SupportedChain, TokenBalance, TransferRecord, WalletBalance,
};

pub const WALLET: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
pub const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";

/// `n` whole units of an asset with `decimals` places
pub fn units(n: u64, decimals: u8) -> U256 {
    U256::from(n) * U256::exp10(decimals as usize)
}

pub fn token(contract: &str, raw_balance: U256) -> RawTokenBalance {
    RawTokenBalance {
        contract_address: contract.to_string(),
        raw_balance,
        symbol: None,
        name: None,
        decimals: None,
    }
}

pub fn metadata(symbol: &str, name: &str, decimals: u8) -> TokenMetadata {
    TokenMetadata {
        symbol: Some(symbol.to_string()),
        name: Some(name.to_string()),
        decimals: Some(decimals),
    }
}

pub fn transfer(
    hash: &str,
    from: &str,
    to: &str,
    category: TransferCategory,
    value: f64,
    asset: Option<&str>,
    timestamp: Option<&str>,
) -> AssetTransfer {
    AssetTransfer {
        hash: hash.to_string(),
        from: from.to_string(),
        to: Some(to.to_string()),
        value: Some(value),
        asset: asset.map(str::to_string),
        category,
        metadata: Some(TransferMetadata {
            block_timestamp: timestamp.map(str::to_string),
        }),
    }
}

#[derive(Default)]
pub struct CallCounts {
    pub native: AtomicUsize,
    pub tokens: AtomicUsize,
    pub metadata: AtomicUsize,
    pub transfers: AtomicUsize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.native.load(Ordering::SeqCst)
            + self.tokens.load(Ordering::SeqCst)
            + self.metadata.load(Ordering::SeqCst)
            + self.transfers.load(Ordering::SeqCst)
    }
}

/// Scripted chain provider counting every call
#[derive(Default)]
pub struct MockProvider {
    pub native_wei: U256,
    pub tokens: Vec<RawTokenBalance>,
    pub metadata: HashMap<String, TokenMetadata>,
    pub outgoing: Vec<AssetTransfer>,
    pub incoming: Vec<AssetTransfer>,
    pub fail: bool,
    pub calls: CallCounts,
    pub last_max_count: AtomicU32,
}

impl MockProvider {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Suspends once so concurrently polled chains interleave
    async fn check(&self) -> anyhow::Result<()> {
        tokio::task::yield_now().await;
        if self.fail {
            anyhow::bail!("provider unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl ChainDataProvider for MockProvider {
    async fn native_balance(&self, _address: &str) -> anyhow::Result<U256> {
        self.calls.native.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        Ok(self.native_wei)
    }

    async fn token_balances(&self, _address: &str) -> anyhow::Result<Vec<RawTokenBalance>> {
        self.calls.tokens.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        Ok(self.tokens.clone())
    }

    async fn token_metadata(&self, contract_address: &str) -> anyhow::Result<TokenMetadata> {
        self.calls.metadata.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        self.metadata
            .get(contract_address)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no metadata for {}", contract_address))
    }

    async fn transfers(
        &self,
        _address: &str,
        direction: TransferDirection,
        _categories: &[TransferCategory],
        max_count: u32,
    ) -> anyhow::Result<Vec<AssetTransfer>> {
        self.calls.transfers.fetch_add(1, Ordering::SeqCst);
        self.last_max_count.store(max_count, Ordering::SeqCst);
        self.check().await?;
        let source = match direction {
            TransferDirection::Outgoing => &self.outgoing,
            TransferDirection::Incoming => &self.incoming,
        };
        Ok(source.iter().take(max_count as usize).cloned().collect())
    }
}

pub fn chain(chain: SupportedChain, provider: &Arc<MockProvider>) -> ChainDescriptor {
    ChainDescriptor::for_chain(chain, provider.clone())
}

/// Base, Ethereum, Arbitrum and Polygon descriptors over the given providers
pub fn chains(providers: &[Arc<MockProvider>; 4]) -> Vec<ChainDescriptor> {
    SupportedChain::ALL
        .into_iter()
        .zip(providers.iter())
        .map(|(c, p)| chain(c, p))
        .collect()
}

pub fn empty_providers() -> [Arc<MockProvider>; 4] {
    std::array::from_fn(|_| Arc::new(MockProvider::default()))
}

pub enum FeedBehavior {
    Live(PriceTable),
    RateLimited,
    Down,
}

/// Scripted price feed counting fetches; suspends like a network call
pub struct MockFeed {
    pub behavior: FeedBehavior,
    pub calls: AtomicUsize,
}

impl MockFeed {
    pub fn new(behavior: FeedBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn live(prices: &[(&str, f64)]) -> Self {
        Self::new(FeedBehavior::Live(
            prices.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
        ))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceFeed for MockFeed {
    async fn fetch_usd_prices(&self) -> Result<PriceTable, PriceFeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match &self.behavior {
            FeedBehavior::Live(table) => Ok(table.clone()),
            FeedBehavior::RateLimited => Err(PriceFeedError::RateLimited),
            FeedBehavior::Down => Err(PriceFeedError::Status(503)),
        }
    }
}

pub fn oracle(feed: &Arc<MockFeed>, cache: &Cache) -> Arc<PriceOracle> {
    Arc::new(PriceOracle::new(feed.clone(), cache.clone()))
}

/// Store capturing everything published to it
#[derive(Default)]
pub struct RecordingStore {
    pub balances: Mutex<Vec<(WalletBalance, Vec<TokenBalance>)>>,
    pub transactions: Mutex<Vec<(String, Vec<TransferRecord>)>>,
    pub fail_balances: bool,
}

#[async_trait]
impl PortfolioStore for RecordingStore {
    async fn save_wallet_balance(
        &self,
        balance: &WalletBalance,
        assets: &[TokenBalance],
    ) -> anyhow::Result<()> {
        if self.fail_balances {
            anyhow::bail!("database unavailable");
        }
        self.balances
            .lock()
            .unwrap()
            .push((balance.clone(), assets.to_vec()));
        Ok(())
    }

    async fn upsert_transactions(
        &self,
        address: &str,
        transactions: &[TransferRecord],
    ) -> anyhow::Result<()> {
        self.transactions
            .lock()
            .unwrap()
            .push((address.to_string(), transactions.to_vec()));
        Ok(())
    }
}
