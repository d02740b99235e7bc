use ethers::types::U256;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::amounts::{parse_raw_amount, parse_raw_timestamp};
use crate::indexer::types::{
    GraphqlResponse, RawPoolSnapshot, RawSupplyCollateralEvent, RawWithdrawCollateralEvent,
};

/// One protocol-wide pool snapshot. The pool is addressable by two keys:
/// the lending pool id and the router id; either may match a user position.
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    pub lending_pool: String,
    pub router: String,
    pub timestamp: i64,
    pub total_supply_assets: U256,
    pub total_borrow_assets: U256,
    pub total_collateral: U256,
    pub available_liquidity: U256,
    pub supply_apr: U256,
    pub borrow_rate: U256,
    pub utilization: U256,
}

impl From<&RawPoolSnapshot> for PoolSnapshot {
    fn from(raw: &RawPoolSnapshot) -> Self {
        Self {
            lending_pool: raw.lending_pool.clone(),
            router: raw.router.clone(),
            timestamp: parse_raw_timestamp(&raw.timestamp),
            total_supply_assets: parse_raw_amount(&raw.total_supply_assets),
            total_borrow_assets: parse_raw_amount(&raw.total_borrow_assets),
            total_collateral: parse_raw_amount(&raw.total_collateral),
            available_liquidity: parse_raw_amount(&raw.available_liquidity),
            supply_apr: parse_raw_amount(&raw.supply_apr),
            borrow_rate: parse_raw_amount(&raw.borrow_rate),
            utilization: parse_raw_amount(&raw.utilization),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollateralAction {
    Supply,
    Withdraw,
}

/// One collateral movement from the raw event log. Supplies add to the
/// running balance, withdrawals subtract.
#[derive(Debug, Clone)]
pub struct CollateralEvent {
    pub lending_pool: String,
    pub user: String,
    pub amount: U256,
    pub action: CollateralAction,
    pub timestamp: i64,
}

impl CollateralEvent {
    pub fn supply(raw: &RawSupplyCollateralEvent) -> Self {
        Self {
            lending_pool: raw.lending_pool.clone(),
            user: raw.user.clone(),
            amount: parse_raw_amount(&raw.amount),
            action: CollateralAction::Supply,
            timestamp: parse_raw_timestamp(&raw.timestamp),
        }
    }

    pub fn withdraw(raw: &RawWithdrawCollateralEvent) -> Self {
        Self {
            lending_pool: raw.lending_pool.clone(),
            user: raw.user.clone(),
            amount: parse_raw_amount(&raw.amount),
            action: CollateralAction::Withdraw,
            timestamp: parse_raw_timestamp(&raw.timestamp),
        }
    }
}

/// Caller-supplied current position in one pool. The same record shape is
/// used for the deposit list and the loan list; `amount` is the user's
/// deposit or borrow depending on which list it sits in.
#[derive(Debug, Clone)]
pub struct UserPoolPosition {
    pub pool_address: String,
    pub token_decimals: u8,
    pub collateral_decimals: u8,
    /// Borrow-token oracle price, raw integer at `price_decimals`
    pub price: U256,
    pub price_decimals: u8,
    pub total_supply_assets: U256,
    pub total_borrow_assets: U256,
    pub amount: U256,
    /// Cached USD value of `amount`; carried for the UI, not used by the math
    pub amount_usd: Decimal,
}

/// Ephemeral per-pool share record merged from the deposit and loan lists.
/// A ratio is zero when the pool-wide total is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolRatio {
    pub deposit_ratio: Decimal,
    pub borrow_ratio: Decimal,
    pub token_decimals: u8,
    pub collateral_decimals: u8,
    pub price_usd: Decimal,
}

/// Caller-supplied collateral metadata per pool; events referencing pools
/// absent from this list are dropped.
#[derive(Debug, Clone)]
pub struct PoolCollateralInfo {
    pub pool_address: String,
    pub router_address: String,
    pub collateral_decimals: u8,
    pub collateral_price: Decimal,
}

/// One chart point. Each series populates only its own fields and leaves
/// the rest at zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataPoint {
    pub timestamp: i64,
    pub date: String,
    #[serde(rename = "totalDeposits")]
    pub total_deposits: Decimal,
    #[serde(rename = "totalBorrows")]
    pub total_borrows: Decimal,
    #[serde(rename = "totalCollateral")]
    pub total_collateral: Decimal,
    #[serde(rename = "supplyApy")]
    pub supply_apy: Decimal,
    #[serde(rename = "borrowRate")]
    pub borrow_rate: Decimal,
}

impl ChartDataPoint {
    pub fn new(timestamp: i64, date: String) -> Self {
        Self {
            timestamp,
            date,
            total_deposits: Decimal::ZERO,
            total_borrows: Decimal::ZERO,
            total_collateral: Decimal::ZERO,
            supply_apy: Decimal::ZERO,
            borrow_rate: Decimal::ZERO,
        }
    }
}

/// Parsed contents of one batched indexer response.
#[derive(Debug, Clone, Default)]
pub struct HistoryDataset {
    pub snapshots: Vec<PoolSnapshot>,
    pub supply_events: Vec<CollateralEvent>,
    pub withdraw_events: Vec<CollateralEvent>,
}

impl From<GraphqlResponse> for HistoryDataset {
    fn from(response: GraphqlResponse) -> Self {
        let data = response.data;
        Self {
            snapshots: data.pool_snapshots.items.iter().map(PoolSnapshot::from).collect(),
            supply_events: data
                .supply_collateral_events
                .items
                .iter()
                .map(CollateralEvent::supply)
                .collect(),
            withdraw_events: data
                .withdraw_collateral_events
                .items
                .iter()
                .map(CollateralEvent::withdraw)
                .collect(),
        }
    }
}
