use std::collections::HashMap;

use tracing::debug;

use super::types::{PoolRatio, PoolSnapshot};

/// Snapshots grouped per user-held pool, each list ascending by timestamp.
/// Also owns the merged time axis the estimate series runs on.
#[derive(Debug, Default)]
pub struct SnapshotIndex {
    by_pool: HashMap<String, Vec<PoolSnapshot>>,
}

impl SnapshotIndex {
    /// Group snapshots under the pools the user holds. A snapshot is matched
    /// by its router key first, then its lending pool key; snapshots for
    /// pools outside the ratio map are dropped silently.
    pub fn build(snapshots: Vec<PoolSnapshot>, ratios: &HashMap<String, PoolRatio>) -> Self {
        let mut by_pool: HashMap<String, Vec<PoolSnapshot>> = HashMap::new();
        let mut dropped = 0usize;

        for snapshot in snapshots {
            let router_key = snapshot.router.to_lowercase();
            let pool_key = snapshot.lending_pool.to_lowercase();
            let key = if ratios.contains_key(&router_key) {
                router_key
            } else if ratios.contains_key(&pool_key) {
                pool_key
            } else {
                dropped += 1;
                continue;
            };
            by_pool.entry(key).or_default().push(snapshot);
        }

        for series in by_pool.values_mut() {
            // Stable: snapshots sharing a timestamp keep their input order
            series.sort_by_key(|s| s.timestamp);
        }

        debug!(
            pool_count = by_pool.len(),
            dropped = dropped,
            "Snapshot index built"
        );
        Self { by_pool }
    }

    /// Ascending, de-duplicated union of every matched pool's timestamps.
    /// Empty when no pool has a matched snapshot.
    pub fn time_axis(&self) -> Vec<i64> {
        let mut axis: Vec<i64> = self
            .by_pool
            .values()
            .flatten()
            .map(|s| s.timestamp)
            .collect();
        axis.sort_unstable();
        axis.dedup();
        axis
    }

    pub fn pools(&self) -> impl Iterator<Item = (&String, &[PoolSnapshot])> {
        self.by_pool.iter().map(|(key, series)| (key, series.as_slice()))
    }

    pub fn pool_count(&self) -> usize {
        self.by_pool.len()
    }
}

/// Rightmost snapshot with timestamp <= `ts`, or None when every snapshot
/// in the (ascending) list is later.
pub fn latest_at_or_before(snapshots: &[PoolSnapshot], ts: i64) -> Option<&PoolSnapshot> {
    let idx = snapshots.partition_point(|s| s.timestamp <= ts);
    if idx == 0 {
        None
    } else {
        Some(&snapshots[idx - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::U256;
    use rust_decimal::Decimal;

    fn snapshot(lending_pool: &str, router: &str, timestamp: i64, supply: u64) -> PoolSnapshot {
        PoolSnapshot {
            lending_pool: lending_pool.to_string(),
            router: router.to_string(),
            timestamp,
            total_supply_assets: U256::from(supply),
            total_borrow_assets: U256::zero(),
            total_collateral: U256::zero(),
            available_liquidity: U256::zero(),
            supply_apr: U256::zero(),
            borrow_rate: U256::zero(),
            utilization: U256::zero(),
        }
    }

    fn ratio() -> PoolRatio {
        PoolRatio {
            deposit_ratio: Decimal::ONE,
            borrow_ratio: Decimal::ZERO,
            token_decimals: 0,
            collateral_decimals: 0,
            price_usd: Decimal::ONE,
        }
    }

    fn ratio_map(keys: &[&str]) -> HashMap<String, PoolRatio> {
        keys.iter().map(|k| (k.to_string(), ratio())).collect()
    }

    #[test]
    fn router_key_matches_first() {
        let ratios = ratio_map(&["0xrouter"]);
        let index = SnapshotIndex::build(vec![snapshot("0xpool", "0xRouter", 100, 1)], &ratios);
        assert_eq!(index.pool_count(), 1);
        assert_eq!(index.time_axis(), vec![100]);
    }

    #[test]
    fn lending_pool_key_matches_when_router_misses() {
        let ratios = ratio_map(&["0xpool"]);
        let index = SnapshotIndex::build(
            vec![snapshot("0xPool", "0xUnknownRouter", 100, 1)],
            &ratios,
        );
        assert_eq!(index.pool_count(), 1);
        assert_eq!(index.time_axis(), vec![100]);
    }

    #[test]
    fn unmatched_snapshots_are_dropped() {
        let ratios = ratio_map(&["0xheld"]);
        let index = SnapshotIndex::build(vec![snapshot("0xother", "0xother2", 100, 1)], &ratios);
        assert_eq!(index.pool_count(), 0);
        assert!(index.time_axis().is_empty());
    }

    #[test]
    fn per_pool_lists_sort_ascending_with_stable_ties() {
        let ratios = ratio_map(&["0xpool"]);
        let index = SnapshotIndex::build(
            vec![
                snapshot("0xpool", "", 200, 1),
                snapshot("0xpool", "", 100, 2),
                snapshot("0xpool", "", 100, 3),
            ],
            &ratios,
        );
        let (_, series) = index.pools().next().unwrap();
        let order: Vec<(i64, U256)> = series
            .iter()
            .map(|s| (s.timestamp, s.total_supply_assets))
            .collect();
        // Equal timestamps keep input order: supply=2 before supply=3
        assert_eq!(
            order,
            vec![
                (100, U256::from(2u64)),
                (100, U256::from(3u64)),
                (200, U256::from(1u64)),
            ]
        );
    }

    #[test]
    fn time_axis_merges_and_dedupes_across_pools() {
        let ratios = ratio_map(&["0xa", "0xb"]);
        let index = SnapshotIndex::build(
            vec![
                snapshot("0xa", "", 300, 1),
                snapshot("0xa", "", 100, 1),
                snapshot("0xb", "", 200, 1),
                snapshot("0xb", "", 100, 1),
            ],
            &ratios,
        );
        assert_eq!(index.time_axis(), vec![100, 200, 300]);
    }

    #[test]
    fn binary_search_returns_rightmost_at_or_before() {
        let series = vec![
            snapshot("0xpool", "", 100, 1),
            snapshot("0xpool", "", 200, 2),
            snapshot("0xpool", "", 300, 3),
        ];
        assert_eq!(latest_at_or_before(&series, 100).unwrap().timestamp, 100);
        assert_eq!(latest_at_or_before(&series, 250).unwrap().timestamp, 200);
        assert_eq!(latest_at_or_before(&series, 300).unwrap().timestamp, 300);
        assert_eq!(latest_at_or_before(&series, 9999).unwrap().timestamp, 300);
    }

    #[test]
    fn binary_search_misses_before_first_snapshot() {
        let series = vec![snapshot("0xpool", "", 100, 1)];
        assert!(latest_at_or_before(&series, 99).is_none());
        assert!(latest_at_or_before(&[], 100).is_none());
    }

    #[test]
    fn equal_timestamps_resolve_to_the_last_inserted() {
        let series = vec![
            snapshot("0xpool", "", 100, 1),
            snapshot("0xpool", "", 100, 2),
        ];
        let found = latest_at_or_before(&series, 100).unwrap();
        assert_eq!(found.total_supply_assets, U256::from(2u64));
    }
}
