use serde::{Deserialize, Serialize};

// Raw wire shapes for the batched history query. Every collection and every
// field is optional: a missing key deserializes to an empty list or "0",
// never an error. Numeric fields arrive as decimal strings and stay strings
// here; parsing to U256/i64 happens in the raw -> domain step.

fn zero() -> String {
    "0".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: HistoryQueryData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQueryData {
    #[serde(rename = "poolSnapshots", default)]
    pub pool_snapshots: Items<RawPoolSnapshot>,
    #[serde(rename = "supplyCollateralEvents", default)]
    pub supply_collateral_events: Items<RawSupplyCollateralEvent>,
    #[serde(rename = "withdrawCollateralEvents", default)]
    pub withdraw_collateral_events: Items<RawWithdrawCollateralEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Items<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for Items<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPoolSnapshot {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "eventType", default)]
    pub event_type: String,
    #[serde(rename = "blockNumber", default = "zero")]
    pub block_number: String,
    #[serde(default = "zero")]
    pub timestamp: String,
    #[serde(rename = "lendingPool", default)]
    pub lending_pool: String,
    #[serde(default)]
    pub router: String,
    #[serde(rename = "totalSupplyAssets", default = "zero")]
    pub total_supply_assets: String,
    #[serde(rename = "totalBorrowAssets", default = "zero")]
    pub total_borrow_assets: String,
    #[serde(rename = "totalCollateral", default = "zero")]
    pub total_collateral: String,
    #[serde(rename = "availableLiquidity", default = "zero")]
    pub available_liquidity: String,
    #[serde(rename = "supplyAPR", default = "zero")]
    pub supply_apr: String,
    #[serde(rename = "borrowRate", default = "zero")]
    pub borrow_rate: String,
    #[serde(default = "zero")]
    pub utilization: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSupplyCollateralEvent {
    #[serde(default = "zero")]
    pub amount: String,
    #[serde(rename = "lendingPool", default)]
    pub lending_pool: String,
    // Carried by supply events only; not used by the series math
    #[serde(rename = "positionAddress", default)]
    pub position_address: String,
    #[serde(default = "zero")]
    pub timestamp: String,
    #[serde(default)]
    pub user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWithdrawCollateralEvent {
    #[serde(default = "zero")]
    pub amount: String,
    #[serde(rename = "lendingPool", default)]
    pub lending_pool: String,
    #[serde(default = "zero")]
    pub timestamp: String,
    #[serde(default)]
    pub user: String,
}
