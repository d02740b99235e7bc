// Caller-supplied current positions. Wallet/session management and on-chain
// reads are external collaborators; the dashboard consumes their output as
// plain data loaded from a JSON file.
use std::fs;

use eyre::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::amounts::parse_raw_amount;
use crate::history::types::{PoolCollateralInfo, UserPoolPosition};

fn zero() -> String {
    "0".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct RawPoolPosition {
    #[serde(rename = "poolAddress")]
    pool_address: String,
    #[serde(rename = "tokenDecimals", default)]
    token_decimals: u8,
    #[serde(rename = "collateralDecimals", default)]
    collateral_decimals: u8,
    #[serde(default = "zero")]
    price: String,
    #[serde(rename = "priceDecimals", default)]
    price_decimals: u8,
    #[serde(rename = "totalSupplyAssets", default = "zero")]
    total_supply_assets: String,
    #[serde(rename = "totalBorrowAssets", default = "zero")]
    total_borrow_assets: String,
    #[serde(default = "zero")]
    amount: String,
    #[serde(rename = "amountUsd", default)]
    amount_usd: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
struct RawCollateralInfo {
    #[serde(rename = "poolAddress")]
    pool_address: String,
    #[serde(rename = "routerAddress", default)]
    router_address: String,
    #[serde(rename = "collateralDecimals", default)]
    collateral_decimals: u8,
    #[serde(rename = "collateralPrice", default)]
    collateral_price: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawDashboardInputs {
    #[serde(default)]
    deposits: Vec<RawPoolPosition>,
    #[serde(default)]
    loans: Vec<RawPoolPosition>,
    #[serde(rename = "collateralInfo", default)]
    collateral_info: Vec<RawCollateralInfo>,
}

/// Everything the transform needs besides the indexer payload.
#[derive(Debug, Clone, Default)]
pub struct DashboardInputs {
    pub deposit_positions: Vec<UserPoolPosition>,
    pub loan_positions: Vec<UserPoolPosition>,
    pub collateral_info: Vec<PoolCollateralInfo>,
}

fn position(raw: &RawPoolPosition) -> UserPoolPosition {
    UserPoolPosition {
        pool_address: raw.pool_address.clone(),
        token_decimals: raw.token_decimals,
        collateral_decimals: raw.collateral_decimals,
        price: parse_raw_amount(&raw.price),
        price_decimals: raw.price_decimals,
        total_supply_assets: parse_raw_amount(&raw.total_supply_assets),
        total_borrow_assets: parse_raw_amount(&raw.total_borrow_assets),
        amount: parse_raw_amount(&raw.amount),
        amount_usd: raw.amount_usd,
    }
}

fn info(raw: &RawCollateralInfo) -> PoolCollateralInfo {
    PoolCollateralInfo {
        pool_address: raw.pool_address.clone(),
        router_address: raw.router_address.clone(),
        collateral_decimals: raw.collateral_decimals,
        collateral_price: raw.collateral_price,
    }
}

impl DashboardInputs {
    #[instrument]
    pub fn load_from_file(path: &str) -> Result<Self> {
        info!(file = %path, "Loading dashboard position inputs");
        let content = fs::read_to_string(path)?;
        let raw: RawDashboardInputs = serde_json::from_str(&content)?;

        let inputs = Self {
            deposit_positions: raw.deposits.iter().map(position).collect(),
            loan_positions: raw.loans.iter().map(position).collect(),
            collateral_info: raw.collateral_info.iter().map(info).collect(),
        };
        debug!(
            deposit_positions = inputs.deposit_positions.len(),
            loan_positions = inputs.loan_positions.len(),
            collateral_pools = inputs.collateral_info.len(),
            "Dashboard position inputs loaded"
        );
        Ok(inputs)
    }
}
