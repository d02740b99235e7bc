use serde::Serialize;
use tracing::{info, instrument};

use super::collateral::build_collateral_series;
use super::estimator::build_estimated_series;
use super::ratios::build_pool_ratios;
use super::snapshots::SnapshotIndex;
use super::types::{ChartDataPoint, HistoryDataset, PoolCollateralInfo, UserPoolPosition};
use crate::indexer::client::{IndexerClient, IndexerError};
use crate::positions::DashboardInputs;

/// The three user-facing chart series, rebuilt from scratch every refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PositionHistory {
    pub deposits: Vec<ChartDataPoint>,
    pub borrows: Vec<ChartDataPoint>,
    pub collateral: Vec<ChartDataPoint>,
}

/// Pure transform: the same dataset and caller inputs always yield the same
/// three series. All intermediate maps live and die inside this call.
#[instrument(skip_all, fields(snapshot_count = dataset.snapshots.len()))]
pub fn build_position_history(
    dataset: &HistoryDataset,
    deposit_positions: &[UserPoolPosition],
    loan_positions: &[UserPoolPosition],
    collateral_info: &[PoolCollateralInfo],
    user_address: &str,
) -> PositionHistory {
    let ratios = build_pool_ratios(deposit_positions, loan_positions);
    let index = SnapshotIndex::build(dataset.snapshots.clone(), &ratios);
    let estimated = build_estimated_series(&index, &ratios);
    let collateral = build_collateral_series(
        &dataset.supply_events,
        &dataset.withdraw_events,
        collateral_info,
        user_address,
    );

    info!(
        deposit_points = estimated.deposits.len(),
        borrow_points = estimated.borrows.len(),
        collateral_points = collateral.len(),
        "Position history rebuilt"
    );

    PositionHistory {
        deposits: estimated.deposits,
        borrows: estimated.borrows,
        collateral,
    }
}

/// Fetch one batch from the indexer and run the full transform.
pub async fn fetch_position_history(
    client: &IndexerClient,
    inputs: &DashboardInputs,
    user_address: &str,
) -> Result<PositionHistory, IndexerError> {
    let response = client.fetch_history().await?;
    let dataset = HistoryDataset::from(response);
    Ok(build_position_history(
        &dataset,
        &inputs.deposit_positions,
        &inputs.loan_positions,
        &inputs.collateral_info,
        user_address,
    ))
}
