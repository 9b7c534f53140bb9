use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use multichain_portfolio::{
    AlchemyProvider, BalanceAggregator, Cache, CoinGeckoFeed, Config, ConsoleStore, PriceOracle,
    RedisCache, TransactionAggregator, WalletSync, VERSION,
};

async fn build_cache(config: &Config) -> Cache {
    let Some(redis_url) = &config.redis_url else {
        info!("REDIS_URL not set, using in-memory cache");
        return Cache::in_memory();
    };

    match RedisCache::connect(redis_url, config.cache_timeout).await {
        Ok(redis) => Cache::new(Arc::new(redis)),
        Err(e) => {
            warn!("Redis unavailable ({}), falling back to in-memory cache", e);
            Cache::in_memory()
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_level(true)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tokio::runtime::Runtime::new()?.block_on(async {
        let config = Config::from_env()?;
        if config.wallet_addresses.is_empty() {
            anyhow::bail!("WALLET_ADDRESS must name at least one wallet");
        }
        for address in &config.wallet_addresses {
            multichain_portfolio::utils::parse_address(address)?;
        }

        info!("Initializing portfolio sync v{}...", VERSION);
        info!("Wallets: {}", config.wallet_addresses.join(", "));

        let cache = build_cache(&config).await;
        let feed = CoinGeckoFeed::new(config.coingecko_api_key.clone(), config.price_timeout)?;
        let prices = Arc::new(PriceOracle::new(Arc::new(feed), cache.clone()));
        let chains = AlchemyProvider::supported_chains(&config.alchemy_api_key, config.provider_timeout)?;

        let balances = Arc::new(
            BalanceAggregator::new(chains.clone(), prices.clone(), cache.clone())
                .with_metadata_concurrency(config.metadata_concurrency),
        );
        let transactions = Arc::new(TransactionAggregator::new(chains, prices, cache));
        let sync = WalletSync::new(balances, transactions, Arc::new(ConsoleStore::new()))
            .with_tx_limit(config.tx_limit);

        let results = sync.sync_all(&config.wallet_addresses).await;
        let failed = results.iter().filter(|r| r.is_err()).count();

        for report in results.iter().flatten() {
            info!(
                "{}: ${:.2} across {} assets, {} transactions",
                report.address, report.total_value_usd, report.assets_saved, report.transactions_saved
            );
        }

        if failed > 0 {
            error!("{} of {} wallets failed to sync", failed, results.len());
            anyhow::bail!("wallet sync failed");
        }

        info!("Shutting down...");
        Ok(())
    })
}
