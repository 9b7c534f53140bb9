use std::sync::Arc;

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, error, info};

use super::{fan_out, ttl};
use crate::cache::Cache;
use crate::models::chain::ChainDescriptor;
use crate::models::portfolio::WalletBalance;
use crate::models::price::PriceTable;
use crate::models::token::{RawTokenBalance, TokenBalance, TokenMetadata, DEFAULT_DECIMALS};
use crate::providers::price_oracle::PriceOracle;
use crate::utils::helper::{format_address, format_units, units_to_f64};

/// Stablecoins priced alongside the native assets
const QUOTED_STABLES: [&str; 3] = ["USDC", "USDT", "DAI"];

const DEFAULT_METADATA_CONCURRENCY: usize = 4;

/// One chain's contribution to a wallet balance
#[derive(Debug, Default)]
struct ChainBalances {
    native_amount: f64,
    native_value_usd: f64,
    tokens: Vec<TokenBalance>,
    /// Value of priced tokens, native excluded
    token_value_usd: f64,
}

/// Merges native and token holdings of an address across chains
pub struct BalanceAggregator {
    chains: Vec<ChainDescriptor>,
    prices: Arc<PriceOracle>,
    cache: Cache,
    metadata_concurrency: usize,
}

impl BalanceAggregator {
    /// Create a new balance aggregator
    pub fn new(chains: Vec<ChainDescriptor>, prices: Arc<PriceOracle>, cache: Cache) -> Self {
        Self {
            chains,
            prices,
            cache,
            metadata_concurrency: DEFAULT_METADATA_CONCURRENCY,
        }
    }

    /// Limit in-flight metadata lookups per chain
    pub fn with_metadata_concurrency(mut self, concurrency: usize) -> Self {
        self.metadata_concurrency = concurrency.max(1);
        self
    }

    fn cache_key(address: &str) -> String {
        format!("balance:{}", address)
    }

    /// Fetch the valued holdings of `address` on every chain. Chains that
    /// fail contribute nothing; the call itself never fails.
    pub async fn fetch_wallet_balance(&self, address: &str) -> WalletBalance {
        let key = Self::cache_key(address);
        if let Some(cached) = self.cache.get::<WalletBalance>(&key).await {
            info!("Using cached balance for {}", format_address(address));
            return cached;
        }

        info!("Fetching balance for wallet: {}", address);
        // One lookup shared by every chain
        let prices = self.prices.get_prices(&self.price_symbols()).await;
        let outcomes =
            fan_out(&self.chains, |chain| self.fetch_chain(chain, address, &prices)).await;

        let mut native_amount = 0.0;
        let mut native_value_usd = 0.0;
        let mut total_value_usd = 0.0;
        let mut tokens = Vec::new();

        for outcome in outcomes {
            match outcome.result {
                Ok(chain_balances) => {
                    native_amount += chain_balances.native_amount;
                    native_value_usd += chain_balances.native_value_usd;
                    total_value_usd += chain_balances.native_value_usd + chain_balances.token_value_usd;
                    tokens.extend(chain_balances.tokens);
                }
                Err(e) => {
                    error!("Error fetching balance from {}: {:#}", outcome.chain.name, e);
                }
            }
        }

        tokens.sort_by(|a, b| {
            b.value_usd
                .partial_cmp(&a.value_usd)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let balance = WalletBalance {
            address: address.to_string(),
            native_balance: native_amount.to_string(),
            native_value_usd,
            tokens,
            total_value_usd,
            last_updated: Utc::now(),
        };

        info!(
            "Total portfolio value for {}: ${:.2}",
            format_address(address),
            balance.total_value_usd
        );
        self.cache.set(&key, &balance, ttl::BALANCE_SECS).await;
        balance
    }

    /// Drop the cached balance so the next fetch goes to the chains
    pub async fn invalidate(&self, address: &str) {
        self.cache.del(&Self::cache_key(address)).await;
    }

    /// Native symbols of every chain plus the quoted stablecoins
    fn price_symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self
            .chains
            .iter()
            .map(|chain| chain.native_symbol.as_str())
            .collect();
        symbols.extend(QUOTED_STABLES);
        symbols
    }

    async fn fetch_chain(
        &self,
        chain: &ChainDescriptor,
        address: &str,
        prices: &PriceTable,
    ) -> anyhow::Result<ChainBalances> {
        debug!("Checking {}...", chain.name);

        let (native_raw, raw_tokens) = tokio::try_join!(
            chain.provider.native_balance(address),
            chain.provider.token_balances(address),
        )?;
        debug!("Found {} tokens on {}", raw_tokens.len(), chain.name);

        let mut result = ChainBalances {
            native_amount: units_to_f64(native_raw, DEFAULT_DECIMALS),
            ..Default::default()
        };
        result.native_value_usd = result.native_amount * prices.price_of(&chain.native_symbol);

        if result.native_amount > 0.0 {
            debug!(
                "{} {} value: ${:.2}",
                chain.name, chain.native_symbol, result.native_value_usd
            );
            result.tokens.push(TokenBalance::native(
                &chain.native_symbol,
                &chain.name,
                format_units(native_raw, DEFAULT_DECIMALS),
                result.native_value_usd,
            ));
        }

        let valued: Vec<Option<TokenBalance>> = stream::iter(
            raw_tokens.into_iter().filter(|token| !token.raw_balance.is_zero()),
        )
        .map(|token| self.value_token(chain, token, prices))
        .buffered(self.metadata_concurrency)
        .collect()
        .await;

        let mut priced = 0;
        for token in valued.into_iter().flatten() {
            if token.value_usd > 0.0 {
                result.token_value_usd += token.value_usd;
                priced += 1;
            }
            result.tokens.push(token);
        }
        debug!("Processed {} priced tokens on {}", priced, chain.name);

        Ok(result)
    }

    /// Resolve metadata and value one holding. `None` when metadata is
    /// unavailable or the amount rounds to zero.
    async fn value_token(
        &self,
        chain: &ChainDescriptor,
        token: RawTokenBalance,
        prices: &PriceTable,
    ) -> Option<TokenBalance> {
        let metadata: TokenMetadata = match token.inline_metadata() {
            Some(metadata) => metadata,
            None => match chain.provider.token_metadata(&token.contract_address).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    error!(
                        "Error fetching token metadata for {} on {}: {:#}",
                        token.contract_address, chain.name, e
                    );
                    return None;
                }
            },
        };

        let decimals = metadata.decimals.unwrap_or(DEFAULT_DECIMALS);
        let amount = units_to_f64(token.raw_balance, decimals);
        if amount <= 0.0 {
            return None;
        }

        let symbol = metadata.symbol.unwrap_or_else(|| "UNKNOWN".to_string());
        let value_usd = amount * prices.price_of(&symbol);

        Some(TokenBalance {
            token_address: token.contract_address,
            symbol,
            name: metadata.name.unwrap_or_else(|| "Unknown Token".to_string()),
            balance: format_units(token.raw_balance, decimals),
            decimals,
            value_usd,
        })
    }
}
