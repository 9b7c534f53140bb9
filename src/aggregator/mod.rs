//! Multi-chain aggregation services

pub mod balance_aggregator;
pub mod transaction_aggregator;
pub mod wallet_sync;

use std::future::Future;

use futures_util::future::join_all;

use crate::models::chain::ChainDescriptor;

pub use balance_aggregator::BalanceAggregator;
pub use transaction_aggregator::TransactionAggregator;
pub use wallet_sync::{SyncReport, WalletSync};

/// Cache lifetimes for aggregated results
pub mod ttl {
    pub const BALANCE_SECS: u64 = 120;
    pub const TRANSACTIONS_SECS: u64 = 120;
}

/// Result of querying one chain
pub(crate) struct ChainOutcome<'a, T> {
    pub chain: &'a ChainDescriptor,
    pub result: anyhow::Result<T>,
}

/// Query every chain concurrently, capturing each chain's result separately.
/// Outcomes come back in descriptor order.
pub(crate) async fn fan_out<'a, T, F, Fut>(
    chains: &'a [ChainDescriptor],
    query: F,
) -> Vec<ChainOutcome<'a, T>>
where
    F: Fn(&'a ChainDescriptor) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    join_all(chains.iter().map(|chain| {
        let fut = query(chain);
        async move {
            ChainOutcome {
                chain,
                result: fut.await,
            }
        }
    }))
    .await
}
