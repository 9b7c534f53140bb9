use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider classification of an on-chain transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferCategory {
    External,
    Internal,
    Erc20,
    Erc721,
    Erc1155,
    #[serde(other)]
    Other,
}

impl TransferCategory {
    /// Categories requested when building transfer history
    pub const HISTORY: [TransferCategory; 4] = [
        TransferCategory::External,
        TransferCategory::Erc20,
        TransferCategory::Erc721,
        TransferCategory::Erc1155,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferCategory::External => "external",
            TransferCategory::Internal => "internal",
            TransferCategory::Erc20 => "erc20",
            TransferCategory::Erc721 => "erc721",
            TransferCategory::Erc1155 => "erc1155",
            TransferCategory::Other => "other",
        }
    }
}

/// Which side of a transfer the queried address is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferMetadata {
    pub block_timestamp: Option<String>,
}

/// Raw transfer event as reported by a chain provider
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTransfer {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub value: Option<f64>,
    pub asset: Option<String>,
    pub category: TransferCategory,
    #[serde(default)]
    pub metadata: Option<TransferMetadata>,
}

impl AssetTransfer {
    pub fn block_timestamp(&self) -> Option<&str> {
        self.metadata.as_ref()?.block_timestamp.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferType {
    Send,
    Receive,
    Transfer,
    Swap,
}

impl TransferType {
    /// Classify a transfer by category and direction
    pub fn classify(category: TransferCategory, direction: TransferDirection) -> Self {
        match (category, direction) {
            (TransferCategory::Erc20, TransferDirection::Outgoing) => TransferType::Transfer,
            (_, TransferDirection::Outgoing) => TransferType::Send,
            (_, TransferDirection::Incoming) => TransferType::Receive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Success,
    Pending,
    Failed,
}

/// Normalized, priced transfer. The hash is its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub hash: String,
    pub chain_id: u64,
    #[serde(rename = "type")]
    pub tx_type: TransferType,
    pub from_token: String,
    pub to_token: String,
    pub amount: String,
    #[serde(rename = "valueUSD")]
    pub value_usd: f64,
    /// Not surfaced by bulk transfer queries
    pub gas_used: Option<String>,
    pub gas_price: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: TransferStatus,
}
