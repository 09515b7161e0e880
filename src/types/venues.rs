//! Venue reference data

use alloy::primitives::Address;
use serde::Serialize;

/// Closed set of venue kinds; quote logic matches exhaustively on this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VenueKind {
    ConstantProduct,
    ConcentratedLiquidity,
    WeightedPool,
    Aggregator,
}

/// Fee schedule for a venue: a flat percentage or selectable fee tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FeeSchedule {
    /// Single fixed fee in basis points of notional.
    FixedBps(u32),
    /// Concentrated-liquidity fee tiers in basis points; the adapter picks
    /// the tier yielding the best output.
    Tiers(&'static [u32]),
}

impl FeeSchedule {
    /// Fee tiers to probe when quoting. Fixed-fee venues have one.
    pub fn tiers(&self) -> Vec<u32> {
        match self {
            FeeSchedule::FixedBps(bps) => vec![*bps],
            FeeSchedule::Tiers(tiers) => tiers.to_vec(),
        }
    }
}

/// Immutable venue reference data.
#[derive(Debug, Clone)]
pub struct VenueDescriptor {
    pub name: &'static str,
    /// Router, pool, or vault address depending on the venue kind.
    pub address: Address,
    pub kind: VenueKind,
    pub fees: FeeSchedule,
    /// Static liquidity-quality score in [0, 1].
    pub liquidity_quality: f64,
}

/// Unordered venue pair, canonicalized so (a, b) == (b, a).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VenuePair {
    pub first: String,
    pub second: String,
}

impl VenuePair {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self { first: a.to_string(), second: b.to_string() }
        } else {
            Self { first: b.to_string(), second: a.to_string() }
        }
    }
}

impl std::fmt::Display for VenuePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<->{}", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venue_pair_is_order_independent() {
        assert_eq!(VenuePair::new("swapx", "aeron"), VenuePair::new("aeron", "swapx"));
    }

    #[test]
    fn fixed_fee_schedule_has_single_tier() {
        assert_eq!(FeeSchedule::FixedBps(30).tiers(), vec![30]);
    }
}
