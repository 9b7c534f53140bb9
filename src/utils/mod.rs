//! Small helpers shared across providers and aggregators

pub mod helper;

pub use helper::{format_address, format_units, parse_address, parse_hex_u256, units_to_f64};
