use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token::TokenBalance;

/// Valued holdings of one address across every supported chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub address: String,
    pub native_balance: String,
    #[serde(rename = "nativeValueUSD")]
    pub native_value_usd: f64,
    /// Sorted by descending USD value
    pub tokens: Vec<TokenBalance>,
    #[serde(rename = "totalValueUSD")]
    pub total_value_usd: f64,
    pub last_updated: DateTime<Utc>,
}

impl WalletBalance {
    /// Highest valued holdings, at most `n`
    pub fn top_tokens(&self, n: usize) -> &[TokenBalance] {
        &self.tokens[..self.tokens.len().min(n)]
    }
}
