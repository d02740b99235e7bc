// Shared constants for the dashboard pipeline

/// Fixed-point scale the protocol uses for rates and unscoped magnitudes.
/// A raw rate of 1e18 means 100%.
pub const RATE_DECIMALS: u8 = 18;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Chart labels keep hour:minute resolution up to this series span
pub const HOURLY_LABEL_MAX_SPAN_DAYS: i64 = 7;

pub const DEFAULT_POSITIONS_FILE: &str = "data/positions.json";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;
pub const HTTP_TIMEOUT_SECS: u64 = 10;
