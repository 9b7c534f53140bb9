use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::types::U256;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::RpcError;
use crate::models::chain::{ChainDescriptor, SupportedChain};
use crate::models::token::{RawTokenBalance, TokenMetadata};
use crate::models::transfer::{AssetTransfer, TransferCategory, TransferDirection};
use crate::traits::data_provider::ChainDataProvider;
use crate::utils::helper::parse_hex_u256;

/// Upper bound on token balance pages followed per wallet
const MAX_TOKEN_PAGES: usize = 10;

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenBalancesResult {
    token_balances: Vec<TokenBalanceEntry>,
    page_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenBalanceEntry {
    contract_address: String,
    token_balance: Option<String>,
}

impl TokenBalanceEntry {
    /// Missing or malformed balances read as zero and are filtered out later
    fn into_raw(self) -> RawTokenBalance {
        let raw_balance = match self.token_balance.as_deref().map(parse_hex_u256) {
            Some(Ok(balance)) => balance,
            Some(Err(e)) => {
                debug!("Treating balance of {} as zero: {:#}", self.contract_address, e);
                U256::zero()
            }
            None => U256::zero(),
        };
        RawTokenBalance {
            contract_address: self.contract_address,
            raw_balance,
            symbol: None,
            name: None,
            decimals: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssetTransfersResult {
    transfers: Vec<AssetTransfer>,
}

/// Alchemy JSON-RPC data provider for one EVM network
pub struct AlchemyProvider {
    client: Client,
    rpc_url: String,
    request_id: AtomicU64,
}

impl AlchemyProvider {
    /// Create a provider for `chain`; every request is bounded by `timeout`
    pub fn new(chain: SupportedChain, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        debug!("Creating Alchemy provider for {}", chain);
        let rpc_url = format!("https://{}.g.alchemy.com/v2/{}", chain.alchemy_network(), api_key);
        Self::with_url(rpc_url, timeout)
    }

    /// Descriptors for every supported chain, each with its own provider
    pub fn supported_chains(api_key: &str, timeout: Duration) -> anyhow::Result<Vec<ChainDescriptor>> {
        SupportedChain::ALL
            .into_iter()
            .map(|chain| {
                let provider = Self::new(chain, api_key, timeout)?;
                Ok(ChainDescriptor::for_chain(chain, Arc::new(provider)))
            })
            .collect()
    }

    /// Create a provider against an explicit RPC endpoint
    pub fn with_url(rpc_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
            request_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> anyhow::Result<T> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let body: RpcResponse<T> = response.json().await?;
        if let Some(err) = body.error {
            return Err(RpcError { code: err.code, message: err.message }.into());
        }
        body.result
            .ok_or_else(|| anyhow::anyhow!("{} returned neither result nor error", method))
    }
}

#[async_trait]
impl ChainDataProvider for AlchemyProvider {
    async fn native_balance(&self, address: &str) -> anyhow::Result<U256> {
        let hex: String = self.call("eth_getBalance", json!([address, "latest"])).await?;
        parse_hex_u256(&hex)
    }

    async fn token_balances(&self, address: &str) -> anyhow::Result<Vec<RawTokenBalance>> {
        let mut balances = Vec::new();
        let mut page_key: Option<String> = None;

        for _ in 0..MAX_TOKEN_PAGES {
            let params = match &page_key {
                Some(key) => json!([address, "erc20", { "pageKey": key }]),
                None => json!([address, "erc20"]),
            };
            let page: TokenBalancesResult = self.call("alchemy_getTokenBalances", params).await?;

            balances.extend(page.token_balances.into_iter().map(TokenBalanceEntry::into_raw));

            match page.page_key {
                Some(next) => page_key = Some(next),
                None => break,
            }
        }

        debug!("Found {} token balances for {}", balances.len(), address);
        Ok(balances)
    }

    async fn token_metadata(&self, contract_address: &str) -> anyhow::Result<TokenMetadata> {
        self.call("alchemy_getTokenMetadata", json!([contract_address]))
            .await
    }

    async fn transfers(
        &self,
        address: &str,
        direction: TransferDirection,
        categories: &[TransferCategory],
        max_count: u32,
    ) -> anyhow::Result<Vec<AssetTransfer>> {
        let filter = transfer_filter(address, direction, categories, max_count);
        let result: AssetTransfersResult =
            self.call("alchemy_getAssetTransfers", json!([filter])).await?;
        Ok(result.transfers)
    }
}

/// `alchemy_getAssetTransfers` filter for one side of an address
fn transfer_filter(
    address: &str,
    direction: TransferDirection,
    categories: &[TransferCategory],
    max_count: u32,
) -> Value {
    let mut filter = json!({
        "fromBlock": "0x0",
        "toBlock": "latest",
        "category": categories.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
        "maxCount": format!("{:#x}", max_count),
        "order": "desc",
        "withMetadata": true,
        "excludeZeroValue": true,
    });
    let side = match direction {
        TransferDirection::Outgoing => "fromAddress",
        TransferDirection::Incoming => "toAddress",
    };
    filter[side] = json!(address);
    filter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_http::serve;

    const WALLET: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

    fn provider(url: &str) -> AlchemyProvider {
        AlchemyProvider::with_url(url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn decodes_token_balance_pages() {
        let page: RpcResponse<TokenBalancesResult> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "address": WALLET,
                "tokenBalances": [
                    { "contractAddress": "0xa", "tokenBalance": "0x0f" },
                    { "contractAddress": "0xb", "tokenBalance": null }
                ],
                "pageKey": "next"
            }
        }))
        .unwrap();

        let result = page.result.unwrap();
        assert_eq!(result.page_key.as_deref(), Some("next"));
        let raw: Vec<RawTokenBalance> =
            result.token_balances.into_iter().map(TokenBalanceEntry::into_raw).collect();
        assert_eq!(raw[0].raw_balance, U256::from(15u64));
        assert!(raw[1].raw_balance.is_zero());
    }

    #[test]
    fn decodes_error_objects() {
        let response: RpcResponse<String> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "invalid address" }
        }))
        .unwrap();

        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn filter_names_the_queried_side_only() {
        let outgoing =
            transfer_filter(WALLET, TransferDirection::Outgoing, &TransferCategory::HISTORY, 10);
        assert_eq!(outgoing["fromAddress"], WALLET);
        assert!(outgoing.get("toAddress").is_none());
        assert_eq!(outgoing["maxCount"], "0xa");
        assert_eq!(outgoing["category"], json!(["external", "erc20", "erc721", "erc1155"]));

        let incoming =
            transfer_filter(WALLET, TransferDirection::Incoming, &TransferCategory::HISTORY, 1);
        assert_eq!(incoming["toAddress"], WALLET);
        assert!(incoming.get("fromAddress").is_none());
        assert_eq!(incoming["maxCount"], "0x1");
    }

    #[tokio::test]
    async fn follows_page_keys() {
        let server = serve(vec![
            (
                200,
                r#"{"jsonrpc":"2.0","id":1,"result":{"tokenBalances":[{"contractAddress":"0xa","tokenBalance":"0x01"},{"contractAddress":"0xb","tokenBalance":null}],"pageKey":"p2"}}"#,
            ),
            (
                200,
                r#"{"jsonrpc":"2.0","id":2,"result":{"tokenBalances":[{"contractAddress":"0xc","tokenBalance":"0xnothex"}]}}"#,
            ),
        ])
        .await;

        let balances = provider(&server.url).token_balances(WALLET).await.unwrap();

        let contracts: Vec<&str> = balances.iter().map(|b| b.contract_address.as_str()).collect();
        assert_eq!(contracts, vec!["0xa", "0xb", "0xc"]);
        assert_eq!(balances[0].raw_balance, U256::one());
        assert!(balances[2].raw_balance.is_zero());

        let bodies = server.bodies();
        assert_eq!(bodies[0]["method"], "alchemy_getTokenBalances");
        assert_eq!(bodies[0]["params"].as_array().unwrap().len(), 2);
        assert_eq!(bodies[1]["params"][2]["pageKey"], "p2");
    }

    #[tokio::test]
    async fn rpc_error_object_surfaces_as_rpc_error() {
        let server = serve(vec![(
            200,
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"invalid address"}}"#,
        )])
        .await;

        let err = provider(&server.url).native_balance("0xbad").await.unwrap_err();

        let rpc = err.downcast_ref::<RpcError>().unwrap();
        assert_eq!(rpc.code, -32602);
        assert_eq!(rpc.message, "invalid address");
    }

    #[tokio::test]
    async fn reads_native_balance_and_transfers() {
        let server = serve(vec![
            (200, r#"{"jsonrpc":"2.0","id":1,"result":"0xde0b6b3a7640000"}"#),
            (
                200,
                r#"{"jsonrpc":"2.0","id":2,"result":{"transfers":[{"hash":"0xh","from":"0x1","to":"0x742d35cc6634c0532925a3b844bc454e4438f44e","value":0.5,"asset":"ETH","category":"external","metadata":{"blockTimestamp":"2024-03-01T12:00:00.000Z"}}]}}"#,
            ),
        ])
        .await;
        let provider = provider(&server.url);

        let wei = provider.native_balance(WALLET).await.unwrap();
        assert_eq!(wei, U256::exp10(18));

        let transfers = provider
            .transfers(WALLET, TransferDirection::Incoming, &TransferCategory::HISTORY, 5)
            .await
            .unwrap();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].value, Some(0.5));

        let bodies = server.bodies();
        assert_eq!(bodies[0]["params"], json!([WALLET, "latest"]));
        assert_eq!(bodies[1]["params"][0]["toAddress"], WALLET);
        assert_eq!(bodies[1]["params"][0]["maxCount"], "0x5");
    }
}
