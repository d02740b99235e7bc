use chrono::{TimeZone, Utc};

use crate::constants::{HOURLY_LABEL_MAX_SPAN_DAYS, SECONDS_PER_DAY};

/// Picks one label granularity for a whole series from the span it covers.
#[derive(Debug, Clone, Copy)]
pub struct DateLabeler {
    include_time: bool,
}

impl DateLabeler {
    pub fn for_span(first: Option<i64>, last: Option<i64>) -> Self {
        let span_days = match (first, last) {
            (Some(first), Some(last)) => (last - first) / SECONDS_PER_DAY,
            _ => 0,
        };
        Self {
            include_time: span_days <= HOURLY_LABEL_MAX_SPAN_DAYS,
        }
    }

    /// "5 Aug 14:30" inside a week-scale series, "5 Aug" beyond it. UTC.
    pub fn label(&self, timestamp: i64) -> String {
        match Utc.timestamp_opt(timestamp, 0).single() {
            Some(dt) => {
                if self.include_time {
                    dt.format("%-d %b %H:%M").to_string()
                } else {
                    dt.format("%-d %b").to_string()
                }
            }
            // Out-of-range timestamp: fall back to the raw number
            None => timestamp.to_string(),
        }
    }
}
