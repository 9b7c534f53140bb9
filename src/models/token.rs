use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// Address used in place of a contract for a chain's native asset
pub const NATIVE_TOKEN_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Decimals assumed for native assets and for tokens without metadata
pub const DEFAULT_DECIMALS: u8 = 18;

/// Represents a valued token holding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub token_address: String,
    pub symbol: String,
    pub name: String,
    /// Human-readable amount
    pub balance: String,
    pub decimals: u8,
    #[serde(rename = "valueUSD")]
    pub value_usd: f64,
}

impl TokenBalance {
    /// Create the entry for a chain's native asset
    pub fn native(symbol: &str, chain_name: &str, balance: String, value_usd: f64) -> Self {
        Self {
            token_address: NATIVE_TOKEN_ADDRESS.to_string(),
            symbol: symbol.to_string(),
            name: format!("{} Native Token", chain_name),
            balance,
            decimals: DEFAULT_DECIMALS,
            value_usd,
        }
    }
}

/// Token holding as enumerated by a chain provider, before valuation
#[derive(Debug, Clone, PartialEq)]
pub struct RawTokenBalance {
    pub contract_address: String,
    pub raw_balance: U256,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: Option<u8>,
}

impl RawTokenBalance {
    /// Metadata carried by the listing itself, if complete
    pub fn inline_metadata(&self) -> Option<TokenMetadata> {
        match (&self.symbol, &self.name, self.decimals) {
            (Some(symbol), Some(name), Some(decimals)) => Some(TokenMetadata {
                symbol: Some(symbol.clone()),
                name: Some(name.clone()),
                decimals: Some(decimals),
            }),
            _ => None,
        }
    }
}

/// ERC-20 style contract metadata
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenMetadata {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: Option<u8>,
}
