use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prices used whenever the live source is unavailable or throttled
pub const FALLBACK_PRICES: [(&str, f64); 9] = [
    ("ETH", 2500.0),
    ("MATIC", 0.70),
    ("BTC", 65000.0),
    ("USDC", 1.0),
    ("USDT", 1.0),
    ("DAI", 1.0),
    ("ARB", 0.80),
    ("WETH", 2500.0),
    ("WBTC", 65000.0),
];

/// Symbol to USD price mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable(BTreeMap<String, f64>);

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The static fallback table
    pub fn fallback() -> Self {
        FALLBACK_PRICES
            .iter()
            .map(|(symbol, price)| (symbol.to_string(), *price))
            .collect()
    }

    /// Price of `symbol` in USD; unknown symbols price at zero
    pub fn price_of(&self, symbol: &str) -> f64 {
        self.0.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.contains_key(symbol)
    }

    pub fn insert(&mut self, symbol: impl Into<String>, price: f64) {
        self.0.insert(symbol.into(), price);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }
}

impl FromIterator<(String, f64)> for PriceTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
