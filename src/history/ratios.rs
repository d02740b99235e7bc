use std::collections::HashMap;

use ethers::types::U256;
use rust_decimal::Decimal;
use tracing::debug;

use super::types::{PoolRatio, UserPoolPosition};
use crate::amounts::u256_to_decimal_scaled;

/// The user's share of a pool-wide total, both sides scaled to the same
/// decimal count before dividing. Zero when the pool total is zero.
fn share_of_total(amount: U256, total: U256, decimals: u8) -> Decimal {
    let total_scaled = u256_to_decimal_scaled(total, decimals);
    if total_scaled == Decimal::ZERO {
        return Decimal::ZERO;
    }
    u256_to_decimal_scaled(amount, decimals) / total_scaled
}

fn base_ratio(position: &UserPoolPosition) -> PoolRatio {
    PoolRatio {
        deposit_ratio: Decimal::ZERO,
        borrow_ratio: Decimal::ZERO,
        token_decimals: position.token_decimals,
        collateral_decimals: position.collateral_decimals,
        price_usd: u256_to_decimal_scaled(position.price, position.price_decimals),
    }
}

/// Merge the deposit and loan position lists into one ratio map keyed by
/// lower-cased pool address. A pool present in only one list keeps the other
/// ratio at zero; a pool present in both updates the one merged record.
/// Best-effort: a ratio above 1 or a zero price is left as-is.
pub fn build_pool_ratios(
    deposit_positions: &[UserPoolPosition],
    loan_positions: &[UserPoolPosition],
) -> HashMap<String, PoolRatio> {
    let mut ratios: HashMap<String, PoolRatio> = HashMap::new();

    for position in deposit_positions {
        let key = position.pool_address.to_lowercase();
        let deposit_ratio =
            share_of_total(position.amount, position.total_supply_assets, position.token_decimals);
        let entry = ratios.entry(key).or_insert_with(|| base_ratio(position));
        entry.deposit_ratio = deposit_ratio;
    }

    for position in loan_positions {
        let key = position.pool_address.to_lowercase();
        let borrow_ratio =
            share_of_total(position.amount, position.total_borrow_assets, position.token_decimals);
        let entry = ratios.entry(key).or_insert_with(|| base_ratio(position));
        entry.borrow_ratio = borrow_ratio;
    }

    debug!(pool_count = ratios.len(), "Pool ratio map built");
    ratios
}
