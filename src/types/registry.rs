//! Static asset, venue, and contract reference tables

use alloy::primitives::{Address, address};
use super::{
    AssetCategory, AssetDescriptor, AssetPair, FeeSchedule, RiskTier, VenueDescriptor, VenueKind,
};

// Token addresses (Base mainnet)
pub const WETH: Address = address!("4200000000000000000000000000000000000006");
pub const USDC: Address = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
pub const USDBC: Address = address!("d9aAEc86B65D86f6A7B5B1b0c42FFA531710b6CA");

// Flash-loan provider pool and the deployed arbitrage executor contract
pub const LOAN_PROVIDER: Address = address!("a238dd80c259a72e81d7e4664a9801593f98d1c5");
pub const ARB_EXECUTOR: Address = address!("7c1f4a52cafe3f1d8953dfc2056b553e2898ab11");

// Venue pool / router / vault addresses
pub const AERON_POOL_WETH_USDC: Address = address!("cDAC0d6c6C59727a65F871236188350531885C43");
pub const AERON_POOL_USDC_USDBC: Address = address!("b4885bc63399bf5518b994c1d0c153334ee579d0");
pub const UNI_V3_QUOTER: Address = address!("3d4e44eb1374240ce5f1b871ab261cd16335b76a");
pub const WEIGHTED_POOL_WETH_USDC: Address = address!("9f12d9e47d8b2b0b6a612d25f1c0b7c67a9a2b04");
pub const META_ROUTER: Address = address!("6ba71a3bcb6d1a7e5c1d3f01c6f2a0edc1a5cf27");

pub const ASSETS: &[AssetDescriptor] = &[
    AssetDescriptor {
        symbol: "USDC",
        address: USDC,
        decimals: 6,
        risk_tier: RiskTier::Stable,
        category: AssetCategory::Stablecoin,
    },
    AssetDescriptor {
        symbol: "USDbC",
        address: USDBC,
        decimals: 6,
        risk_tier: RiskTier::Stable,
        category: AssetCategory::Stablecoin,
    },
    AssetDescriptor {
        symbol: "WETH",
        address: WETH,
        decimals: 18,
        risk_tier: RiskTier::Major,
        category: AssetCategory::Native,
    },
];

pub const PAIRS: &[AssetPair] = &[
    AssetPair { base: "USDC", quote: "WETH" },
    AssetPair { base: "USDC", quote: "USDbC" },
];

pub fn lookup_asset(symbol: &str) -> Option<&'static AssetDescriptor> {
    ASSETS.iter().find(|a| a.symbol == symbol)
}

/// Resolve a "BASE/QUOTE" string back to a registered pair.
pub fn parse_pair(s: &str) -> Option<AssetPair> {
    PAIRS.iter().copied().find(|p| p.to_string() == s)
}

pub fn lookup_venue(pair: &AssetPair, name: &str) -> Option<VenueDescriptor> {
    venues_for(pair).into_iter().find(|v| v.name == name)
}

/// Venues able to quote the given pair. The address is the pool for pool
/// venues and the router/vault for routed venues.
pub fn venues_for(pair: &AssetPair) -> Vec<VenueDescriptor> {
    match (pair.base, pair.quote) {
        ("USDC", "WETH") => vec![
            VenueDescriptor {
                name: "aeron-v2",
                address: AERON_POOL_WETH_USDC,
                kind: VenueKind::ConstantProduct,
                fees: FeeSchedule::FixedBps(30),
                liquidity_quality: 0.85,
            },
            VenueDescriptor {
                name: "uniswap-v3",
                address: UNI_V3_QUOTER,
                kind: VenueKind::ConcentratedLiquidity,
                fees: FeeSchedule::Tiers(&[5, 30, 100]),
                liquidity_quality: 0.95,
            },
            VenueDescriptor {
                name: "weighted-80-20",
                address: WEIGHTED_POOL_WETH_USDC,
                kind: VenueKind::WeightedPool,
                fees: FeeSchedule::FixedBps(25),
                liquidity_quality: 0.60,
            },
            VenueDescriptor {
                name: "meta-router",
                address: META_ROUTER,
                kind: VenueKind::Aggregator,
                fees: FeeSchedule::FixedBps(10),
                liquidity_quality: 0.70,
            },
        ],
        ("USDC", "USDbC") => vec![
            VenueDescriptor {
                name: "aeron-v2",
                address: AERON_POOL_USDC_USDBC,
                kind: VenueKind::ConstantProduct,
                fees: FeeSchedule::FixedBps(5),
                liquidity_quality: 0.80,
            },
            VenueDescriptor {
                name: "uniswap-v3",
                address: UNI_V3_QUOTER,
                kind: VenueKind::ConcentratedLiquidity,
                fees: FeeSchedule::Tiers(&[1, 5]),
                liquidity_quality: 0.90,
            },
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pair_has_at_least_two_venues() {
        for pair in PAIRS {
            assert!(venues_for(pair).len() >= 2, "pair {pair} cannot arbitrage");
        }
    }

    #[test]
    fn pair_assets_are_registered() {
        for pair in PAIRS {
            assert!(lookup_asset(pair.base).is_some());
            assert!(lookup_asset(pair.quote).is_some());
        }
    }
}
