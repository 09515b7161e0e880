//! Price quote types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A single venue's answer to "what would `amount_in` of `input` buy?".
/// Created fresh on every aggregator call, never mutated, discarded once it
/// exceeds the freshness threshold.
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    pub venue: String,
    pub input_symbol: String,
    pub output_symbol: String,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    /// Output units per input unit at the trial size.
    pub unit_price: Decimal,
    /// Fee tier actually used for this quote, basis points.
    pub fee_bps: u32,
    /// Pool depth estimate in input-asset units.
    pub depth: Decimal,
    pub captured_at: DateTime<Utc>,
}

impl PriceQuote {
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.captured_at).num_seconds()
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, max_age_secs: i64) -> bool {
        self.age_secs(now) <= max_age_secs
    }
}
