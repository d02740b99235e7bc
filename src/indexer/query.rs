// The one batched document the dashboard issues per refresh cycle. The
// endpoint is content-addressed by this exact string; there is no pagination.
pub const POSITION_HISTORY_QUERY: &str = r#"
query PositionHistory {
  poolSnapshots {
    items {
      availableLiquidity
      timestamp
      blockNumber
      borrowRate
      eventType
      id
      lendingPool
      router
      supplyAPR
      totalBorrowAssets
      totalCollateral
      totalSupplyAssets
      utilization
    }
  }
  supplyCollateralEvents {
    items {
      amount
      lendingPool
      positionAddress
      timestamp
      user
    }
  }
  withdrawCollateralEvents {
    items {
      amount
      lendingPool
      timestamp
      user
    }
  }
}
"#;
