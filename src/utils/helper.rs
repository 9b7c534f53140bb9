use ethers::types::{Address, U256};
use std::str::FromStr;

/// Parse an EVM address from string, with better error messages
pub fn parse_address(s: &str) -> anyhow::Result<Address> {
    Address::from_str(s).map_err(|e| anyhow::anyhow!("Invalid address {}: {}", s, e))
}

/// Parse a `0x`-prefixed hex quantity as returned by JSON-RPC
pub fn parse_hex_u256(s: &str) -> anyhow::Result<U256> {
    let digits = s.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(digits, 16).map_err(|e| anyhow::anyhow!("Invalid hex quantity {}: {}", s, e))
}

/// Format a raw integer amount as a decimal string with `decimals` places,
/// trailing zeros trimmed
pub fn format_units(amount: U256, decimals: u8) -> String {
    let decimals = decimals as usize;
    let mut digits = amount.to_string();

    if decimals == 0 {
        return digits;
    }
    if digits.len() <= decimals {
        digits.insert_str(0, &"0".repeat(decimals - digits.len() + 1));
    }

    let split = digits.len() - decimals;
    let (whole, fraction) = digits.split_at(split);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Human-readable amount as a float for valuation
pub fn units_to_f64(amount: U256, decimals: u8) -> f64 {
    format_units(amount, decimals).parse().unwrap_or(0.0)
}

/// Format an address for display (truncated)
pub fn format_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    match (address.get(..6), address.get(address.len() - 4..)) {
        (Some(head), Some(tail)) => format!("{}...{}", head, tail),
        _ => address.to_string(),
    }
}
