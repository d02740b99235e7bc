use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use super::labels::DateLabeler;
use super::snapshots::{latest_at_or_before, SnapshotIndex};
use super::types::{ChartDataPoint, PoolRatio};
use crate::amounts::{rate_to_percent, u256_to_decimal_scaled};

/// The two estimate-based series, one point per axis timestamp each.
#[derive(Debug, Clone, Default)]
pub struct EstimatedSeries {
    pub deposits: Vec<ChartDataPoint>,
    pub borrows: Vec<ChartDataPoint>,
}

/// Walk the merged time axis and rebuild the user's share of every pool at
/// each point from the latest snapshot at or before it. The result is an
/// estimate: the user's current pool share projected backwards, not a
/// ground-truth balance.
pub fn build_estimated_series(
    index: &SnapshotIndex,
    ratios: &HashMap<String, PoolRatio>,
) -> EstimatedSeries {
    let axis = index.time_axis();
    let labeler = DateLabeler::for_span(axis.first().copied(), axis.last().copied());

    let mut deposits = Vec::with_capacity(axis.len());
    let mut borrows = Vec::with_capacity(axis.len());

    for &ts in &axis {
        let mut total_deposits = Decimal::ZERO;
        let mut total_borrows = Decimal::ZERO;
        let mut weighted_supply_apy = Decimal::ZERO;
        let mut weighted_borrow_rate = Decimal::ZERO;

        for (pool, snapshots) in index.pools() {
            let Some(ratio) = ratios.get(pool) else {
                continue;
            };
            // A pool whose first snapshot is later than ts contributes nothing here
            let Some(snapshot) = latest_at_or_before(snapshots, ts) else {
                continue;
            };

            let user_deposit =
                u256_to_decimal_scaled(snapshot.total_supply_assets, ratio.token_decimals)
                    * ratio.deposit_ratio
                    * ratio.price_usd;
            let user_borrow =
                u256_to_decimal_scaled(snapshot.total_borrow_assets, ratio.token_decimals)
                    * ratio.borrow_ratio
                    * ratio.price_usd;

            total_deposits += user_deposit;
            total_borrows += user_borrow;
            weighted_supply_apy += rate_to_percent(snapshot.supply_apr) * user_deposit;
            weighted_borrow_rate += rate_to_percent(snapshot.borrow_rate) * user_borrow;
        }

        // Dollar-weighted average rates; zero when nothing is deposited/borrowed
        let supply_apy = if total_deposits > Decimal::ZERO {
            weighted_supply_apy / total_deposits
        } else {
            Decimal::ZERO
        };
        let borrow_rate = if total_borrows > Decimal::ZERO {
            weighted_borrow_rate / total_borrows
        } else {
            Decimal::ZERO
        };

        let date = labeler.label(ts);

        let mut deposit_point = ChartDataPoint::new(ts, date.clone());
        deposit_point.total_deposits = total_deposits;
        deposit_point.supply_apy = supply_apy;
        deposits.push(deposit_point);

        let mut borrow_point = ChartDataPoint::new(ts, date);
        borrow_point.total_borrows = total_borrows;
        borrow_point.borrow_rate = borrow_rate;
        borrows.push(borrow_point);
    }

    debug!(point_count = axis.len(), "Estimate series built");
    EstimatedSeries { deposits, borrows }
}
