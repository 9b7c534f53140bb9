use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::PriceFeedError;
use crate::models::price::PriceTable;
use crate::traits::price_provider::PriceFeed;

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko ids and the internal symbols each one prices
const COIN_IDS: [(&str, &[&str]); 8] = [
    ("ethereum", &["ETH", "WETH"]),
    ("matic-network", &["MATIC"]),
    ("bitcoin", &["BTC"]),
    ("usd-coin", &["USDC"]),
    ("tether", &["USDT"]),
    ("dai", &["DAI"]),
    ("arbitrum", &["ARB"]),
    ("wrapped-bitcoin", &["WBTC"]),
];

#[derive(Debug, Deserialize)]
struct CoinPrice {
    usd: Option<f64>,
}

/// Price feed backed by the CoinGecko simple price endpoint
#[derive(Clone)]
pub struct CoinGeckoFeed {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl CoinGeckoFeed {
    /// Create a new feed; every request is bounded by `timeout`
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout,
        })
    }

    /// Point the feed at another API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn ids_param() -> String {
        COIN_IDS
            .iter()
            .map(|(id, _)| *id)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// 429 maps to `RateLimited`, any other non-2xx to `Status`
    fn check_status(status: StatusCode) -> Result<(), PriceFeedError> {
        match status {
            StatusCode::TOO_MANY_REQUESTS => Err(PriceFeedError::RateLimited),
            status if !status.is_success() => Err(PriceFeedError::Status(status.as_u16())),
            _ => Ok(()),
        }
    }

    fn request_error(&self, e: reqwest::Error) -> PriceFeedError {
        if e.is_timeout() {
            PriceFeedError::Timeout(self.timeout.as_secs())
        } else {
            PriceFeedError::Request(e)
        }
    }

    fn to_table(response: HashMap<String, CoinPrice>) -> PriceTable {
        let mut table = PriceTable::new();
        for (id, symbols) in COIN_IDS {
            if let Some(usd) = response.get(id).and_then(|p| p.usd) {
                for symbol in symbols {
                    table.insert(*symbol, usd);
                }
            }
        }
        table
    }
}

#[async_trait]
impl PriceFeed for CoinGeckoFeed {
    async fn fetch_usd_prices(&self) -> Result<PriceTable, PriceFeedError> {
        let url = format!("{}/simple/price", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("ids", Self::ids_param().as_str()), ("vs_currencies", "usd")])
            .header("x-cg-demo-api-key", &self.api_key)
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| PriceFeedError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| self.request_error(e))?;
        Self::check_status(response.status())?;

        let body: HashMap<String, CoinPrice> =
            response.json().await.map_err(|e| self.request_error(e))?;
        debug!("CoinGecko returned {} price entries", body.len());

        let table = Self::to_table(body);
        if table.is_empty() {
            warn!("CoinGecko response priced none of the known coins");
        }
        Ok(table)
    }
}
