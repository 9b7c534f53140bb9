use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use super::{fan_out, ttl};
use crate::cache::Cache;
use crate::models::chain::ChainDescriptor;
use crate::models::price::PriceTable;
use crate::models::transfer::{
    AssetTransfer, TransferCategory, TransferDirection, TransferRecord, TransferStatus,
    TransferType,
};
use crate::providers::price_oracle::PriceOracle;
use crate::utils::helper::format_address;

/// Symbols priced when valuing transfers
const TRANSFER_PRICE_SYMBOLS: [&str; 2] = ["ETH", "MATIC"];

/// Builds a de-duplicated, priced transfer history across chains
pub struct TransactionAggregator {
    chains: Vec<ChainDescriptor>,
    prices: Arc<PriceOracle>,
    cache: Cache,
}

impl TransactionAggregator {
    /// Create a new transaction aggregator
    pub fn new(chains: Vec<ChainDescriptor>, prices: Arc<PriceOracle>, cache: Cache) -> Self {
        Self { chains, prices, cache }
    }

    fn cache_key(address: &str, limit: usize) -> String {
        format!("transactions:{}:{}", address, limit)
    }

    /// Most recent transfers touching `address` on any chain, newest first,
    /// at most `limit`. The call itself never fails.
    pub async fn fetch_transaction_history(&self, address: &str, limit: usize) -> Vec<TransferRecord> {
        let key = Self::cache_key(address, limit);
        if let Some(cached) = self.cache.get::<Vec<TransferRecord>>(&key).await {
            info!("Using cached transactions for {}", format_address(address));
            return cached;
        }

        info!("Fetching transaction history for wallet: {}", address);
        let per_direction = u32::try_from(limit / 2).unwrap_or(u32::MAX);
        if per_direction == 0 {
            debug!("Limit {} leaves no transfers per direction", limit);
            return Vec::new();
        }

        let prices = self.prices.get_prices(&TRANSFER_PRICE_SYMBOLS).await;
        let outcomes = fan_out(&self.chains, |chain| {
            self.fetch_chain(chain, address, per_direction, &prices)
        })
        .await;

        let mut all = Vec::new();
        for outcome in outcomes {
            match outcome.result {
                Ok(records) => all.extend(records),
                Err(e) => {
                    error!("Error fetching transactions from {}: {:#}", outcome.chain.name, e);
                }
            }
        }

        let mut history = dedup_by_hash(all);
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        history.truncate(limit);

        info!("Total unique transactions found: {}", history.len());
        self.cache.set(&key, &history, ttl::TRANSACTIONS_SECS).await;
        history
    }

    async fn fetch_chain(
        &self,
        chain: &ChainDescriptor,
        address: &str,
        per_direction: u32,
        prices: &PriceTable,
    ) -> anyhow::Result<Vec<TransferRecord>> {
        debug!("Fetching transactions from {}...", chain.name);

        let categories = TransferCategory::HISTORY;
        let (outgoing, incoming) = tokio::try_join!(
            chain.provider.transfers(address, TransferDirection::Outgoing, &categories, per_direction),
            chain.provider.transfers(address, TransferDirection::Incoming, &categories, per_direction),
        )?;
        debug!(
            "Found {} transactions on {}",
            outgoing.len() + incoming.len(),
            chain.name
        );

        let records: Vec<TransferRecord> = outgoing
            .iter()
            .chain(incoming.iter())
            .filter_map(|transfer| normalize(chain, address, transfer, prices))
            .collect();

        debug!("Added {} valid transactions from {}", records.len(), chain.name);
        Ok(records)
    }
}

/// Turn a provider transfer into a priced record. Transfers without a
/// usable block timestamp are dropped.
fn normalize(
    chain: &ChainDescriptor,
    address: &str,
    transfer: &AssetTransfer,
    prices: &PriceTable,
) -> Option<TransferRecord> {
    let timestamp = match transfer.block_timestamp() {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                debug!("Dropping transfer {} with bad timestamp {}: {}", transfer.hash, raw, e);
                return None;
            }
        },
        None => return None,
    };

    let direction = if transfer.from.eq_ignore_ascii_case(address) {
        TransferDirection::Outgoing
    } else {
        TransferDirection::Incoming
    };
    let asset = transfer
        .asset
        .clone()
        .unwrap_or_else(|| chain.native_symbol.clone());
    let amount = transfer.value.unwrap_or(0.0);

    Some(TransferRecord {
        hash: transfer.hash.clone(),
        chain_id: chain.id,
        tx_type: TransferType::classify(transfer.category, direction),
        from_token: asset.clone(),
        to_token: asset.clone(),
        amount: amount.to_string(),
        value_usd: amount * prices.price_of(&asset),
        gas_used: None,
        gas_price: None,
        timestamp,
        status: TransferStatus::Success,
    })
}

/// Keep the first record seen for each hash
fn dedup_by_hash(records: Vec<TransferRecord>) -> Vec<TransferRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.hash.clone()))
        .collect()
}
