//! Asset reference data

use alloy::primitives::Address;
use serde::Serialize;

/// Coarse asset risk tier: 1 = stable asset, 4 = highly volatile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskTier {
    Stable = 1,
    Major = 2,
    Midcap = 3,
    Volatile = 4,
}

impl RiskTier {
    pub fn weight(self) -> f64 {
        match self {
            RiskTier::Stable => 0.05,
            RiskTier::Major => 0.20,
            RiskTier::Midcap => 0.50,
            RiskTier::Volatile => 0.90,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssetCategory {
    Stablecoin,
    Native,
    Governance,
    Other,
}

/// Immutable asset reference data, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AssetDescriptor {
    pub symbol: &'static str,
    pub address: Address,
    pub decimals: u32,
    pub risk_tier: RiskTier,
    pub category: AssetCategory,
}

/// Asset pair of interest, identified by borrowed/target symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetPair {
    pub base: &'static str,
    pub quote: &'static str,
}

impl std::fmt::Display for AssetPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
