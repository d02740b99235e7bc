use ethers::types::U256;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::constants::RATE_DECIMALS;

// Raw magnitudes stay U256 until the final USD conversion; going through
// floating point earlier loses precision at 18-decimal scale.

/// Parse a raw integer-string magnitude from the indexer. Unparseable input counts as zero.
pub fn parse_raw_amount(raw: &str) -> U256 {
    U256::from_dec_str(raw.trim()).unwrap_or(U256::zero())
}

pub fn parse_raw_timestamp(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0)
}

pub fn u256_to_decimal_scaled(val: U256, decimals: u8) -> Decimal {
    let formatted =
        ethers::utils::format_units(val, decimals as usize).unwrap_or_else(|_| "0".to_string());
    Decimal::from_str(&formatted).unwrap_or(Decimal::ZERO)
}

/// Protocol rates are 18-decimal fixed point where 1e18 is 100%.
pub fn rate_to_percent(val: U256) -> Decimal {
    u256_to_decimal_scaled(val, RATE_DECIMALS) * Decimal::from(100)
}
