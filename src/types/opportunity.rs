//! Arbitrage opportunity types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Itemized cost side of an opportunity.
/// Invariant: `total == venue_fees + loan_fee + gas_cost`.
#[derive(Debug, Clone, Serialize)]
pub struct FeeBreakdown {
    pub venue_fees: Decimal,
    pub loan_fee: Decimal,
    pub gas_cost: Decimal,
    pub total: Decimal,
}

impl FeeBreakdown {
    pub fn new(venue_fees: Decimal, loan_fee: Decimal, gas_cost: Decimal) -> Self {
        Self {
            venue_fees,
            loan_fee,
            gas_cost,
            total: venue_fees + loan_fee + gas_cost,
        }
    }
}

/// A vetted candidate trade. Consumed and discarded by the pipeline; only
/// the audit log keeps it beyond that.
#[derive(Debug, Clone, Serialize)]
pub struct ArbitrageOpportunity {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub pair: String,
    pub buy_venue: String,
    pub sell_venue: String,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub buy_fee_bps: u32,
    pub sell_fee_bps: u32,
    pub loan_amount: Decimal,
    pub gross_profit: Decimal,
    pub fees: FeeBreakdown,
    pub net_profit: Decimal,
    pub confidence: f64,
    pub risk: f64,
    /// Derived execution priority, higher = more attractive.
    pub priority: f64,
    pub risk_flags: Vec<String>,
}

impl ArbitrageOpportunity {
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.timestamp).num_seconds()
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, max_age_secs: i64) -> bool {
        self.age_secs(now) <= max_age_secs
    }
}
