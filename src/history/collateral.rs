use std::collections::HashMap;

use ethers::types::U256;
use rust_decimal::Decimal;
use tracing::debug;

use super::labels::DateLabeler;
use super::types::{ChartDataPoint, CollateralAction, CollateralEvent, PoolCollateralInfo};
use crate::amounts::u256_to_decimal_scaled;

/// Replay the user's collateral event log in timestamp order, keeping one
/// running raw balance per pool. Unlike the deposit/borrow estimate this
/// series is exact: every qualifying event becomes a data point.
pub fn build_collateral_series(
    supply_events: &[CollateralEvent],
    withdraw_events: &[CollateralEvent],
    collateral_info: &[PoolCollateralInfo],
    user_address: &str,
) -> Vec<ChartDataPoint> {
    // Events may reference a pool by either of its ids; an absent id must
    // not become a matchable empty key
    let mut info_by_key: HashMap<String, &PoolCollateralInfo> = HashMap::new();
    for info in collateral_info {
        if !info.pool_address.is_empty() {
            info_by_key.insert(info.pool_address.to_lowercase(), info);
        }
        if !info.router_address.is_empty() {
            info_by_key.insert(info.router_address.to_lowercase(), info);
        }
    }

    let user = user_address.to_lowercase();
    let mut ledger: Vec<&CollateralEvent> = supply_events
        .iter()
        .chain(withdraw_events.iter())
        .filter(|event| event.user.to_lowercase() == user)
        .filter(|event| info_by_key.contains_key(&event.lending_pool.to_lowercase()))
        .collect();
    // Stable: events sharing a timestamp keep their given interleaving
    ledger.sort_by_key(|event| event.timestamp);

    if ledger.is_empty() {
        return Vec::new();
    }

    let labeler = DateLabeler::for_span(
        ledger.first().map(|event| event.timestamp),
        ledger.last().map(|event| event.timestamp),
    );

    let mut balances: HashMap<String, U256> = HashMap::new();
    let mut series = Vec::with_capacity(ledger.len());

    for event in ledger {
        let key = event.lending_pool.to_lowercase();
        let balance = balances.entry(key).or_insert_with(U256::zero);
        *balance = match event.action {
            CollateralAction::Supply => balance.saturating_add(event.amount),
            // A withdrawal past the tracked balance floors at zero
            CollateralAction::Withdraw => balance.saturating_sub(event.amount),
        };

        let mut total_usd = Decimal::ZERO;
        for (pool, balance) in &balances {
            let Some(info) = info_by_key.get(pool) else {
                continue;
            };
            total_usd +=
                u256_to_decimal_scaled(*balance, info.collateral_decimals) * info.collateral_price;
        }

        let mut point = ChartDataPoint::new(event.timestamp, labeler.label(event.timestamp));
        point.total_collateral = total_usd;
        series.push(point);
    }

    debug!(event_count = series.len(), "Collateral series built");
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = "0xUser";

    fn event(pool: &str, user: &str, amount: U256, action: CollateralAction, timestamp: i64) -> CollateralEvent {
        CollateralEvent {
            lending_pool: pool.to_string(),
            user: user.to_string(),
            amount,
            action,
            timestamp,
        }
    }

    fn supply(pool: &str, amount: U256, timestamp: i64) -> CollateralEvent {
        event(pool, USER, amount, CollateralAction::Supply, timestamp)
    }

    fn withdraw(pool: &str, amount: U256, timestamp: i64) -> CollateralEvent {
        event(pool, USER, amount, CollateralAction::Withdraw, timestamp)
    }

    fn info(pool: &str, router: &str, decimals: u8, price: Decimal) -> PoolCollateralInfo {
        PoolCollateralInfo {
            pool_address: pool.to_string(),
            router_address: router.to_string(),
            collateral_decimals: decimals,
            collateral_price: price,
        }
    }

    fn units(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    #[test]
    fn replays_supplies_and_withdrawals_in_order() {
        let infos = vec![info("0xPool", "0xRouter", 18, Decimal::from(2))];
        let series = build_collateral_series(
            &[supply("0xPool", units(100), 10)],
            &[withdraw("0xPool", units(40), 20)],
            &infos,
            USER,
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, 10);
        assert_eq!(series[0].total_collateral, Decimal::from(200));
        assert_eq!(series[1].timestamp, 20);
        assert_eq!(series[1].total_collateral, Decimal::from(120));
        // Only the collateral field is populated on this series
        assert_eq!(series[0].total_deposits, Decimal::ZERO);
        assert_eq!(series[0].supply_apy, Decimal::ZERO);
    }

    #[test]
    fn overdraw_clamps_balance_to_zero() {
        let infos = vec![info("0xPool", "0xRouter", 18, Decimal::from(2))];
        let series = build_collateral_series(
            &[supply("0xPool", units(100), 10)],
            &[
                withdraw("0xPool", units(40), 20),
                withdraw("0xPool", units(1000), 30),
            ],
            &infos,
            USER,
        );

        assert_eq!(series.len(), 3);
        assert_eq!(series[2].total_collateral, Decimal::ZERO);
    }

    #[test]
    fn balance_never_goes_negative_under_any_interleaving() {
        let infos = vec![info("0xPool", "", 0, Decimal::ONE)];
        let series = build_collateral_series(
            &[
                supply("0xPool", U256::from(5u64), 10),
                supply("0xPool", U256::from(3u64), 30),
            ],
            &[
                withdraw("0xPool", U256::from(9u64), 20),
                withdraw("0xPool", U256::from(1u64), 40),
            ],
            &infos,
            USER,
        );
        for point in &series {
            assert!(point.total_collateral >= Decimal::ZERO);
        }
        // 5 -> clamp(5-9)=0 -> 3 -> 2
        assert_eq!(series[3].total_collateral, Decimal::from(2));
    }

    #[test]
    fn filters_to_the_querying_user_case_insensitively() {
        let infos = vec![info("0xPool", "", 0, Decimal::ONE)];
        let series = build_collateral_series(
            &[
                event("0xPool", "0xUSER", U256::from(7u64), CollateralAction::Supply, 10),
                event("0xPool", "0xSomeoneElse", U256::from(100u64), CollateralAction::Supply, 15),
            ],
            &[],
            &infos,
            "0xuser",
        );
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].total_collateral, Decimal::from(7));
    }

    #[test]
    fn events_for_unknown_pools_are_dropped() {
        let infos = vec![info("0xKnown", "", 0, Decimal::ONE)];
        let series = build_collateral_series(
            &[supply("0xUnknown", U256::from(5u64), 10)],
            &[],
            &infos,
            USER,
        );
        assert!(series.is_empty());
    }

    #[test]
    fn events_match_by_router_address_too() {
        let infos = vec![info("0xPool", "0xRouter", 0, Decimal::ONE)];
        let series = build_collateral_series(
            &[supply("0xRouter", U256::from(5u64), 10)],
            &[],
            &infos,
            USER,
        );
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].total_collateral, Decimal::from(5));
    }

    #[test]
    fn totals_sum_across_pools() {
        let infos = vec![
            info("0xA", "", 0, Decimal::from(2)),
            info("0xB", "", 0, Decimal::from(3)),
        ];
        let series = build_collateral_series(
            &[
                supply("0xA", U256::from(10u64), 10),
                supply("0xB", U256::from(10u64), 20),
            ],
            &[],
            &infos,
            USER,
        );
        assert_eq!(series[0].total_collateral, Decimal::from(20));
        assert_eq!(series[1].total_collateral, Decimal::from(50));
    }

    #[test]
    fn no_qualifying_events_is_an_empty_series() {
        assert!(build_collateral_series(&[], &[], &[], USER).is_empty());
    }
}
