//! Transaction execution: signer accounting, the live executor, and the
//! dry-run stand-in

pub mod signer;
pub mod engine;
pub mod dry_run;

pub use signer::*;
pub use engine::*;
pub use dry_run::*;

use alloy::primitives::Bytes;
use alloy::sol_types::SolValue;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    config::settings::LOAN_FEE_BPS,
    errors::{EngineError, EngineResult},
    types::{lookup_venue, parse_pair, ArbitrageOpportunity, AssetDescriptor, ExecutionResult},
    utils::to_raw,
};

/// Something that can carry a vetted opportunity to a terminal outcome.
#[async_trait]
pub trait Executor: Send + Sync {
    fn is_dry_run(&self) -> bool;

    async fn execute(
        &self,
        opportunity: &ArbitrageOpportunity,
        asset: &AssetDescriptor,
    ) -> EngineResult<ExecutionResult>;

    /// Re-align signer accounting with the chain after an ambiguous outcome.
    /// Operator-initiated, never run automatically after a timeout. No-op
    /// for executors that never sign.
    async fn resync(&self) -> EngineResult<()> {
        Ok(())
    }
}

/// Opaque route for the on-chain executor: buy pool, sell pool, and the
/// minimum final balance that keeps the loan repayable with its premium.
pub fn encode_route(
    opportunity: &ArbitrageOpportunity,
    asset: &AssetDescriptor,
) -> EngineResult<Bytes> {
    let pair = parse_pair(&opportunity.pair).ok_or_else(|| EngineError::DataParsing {
        context: format!("route for unregistered pair {}", opportunity.pair),
        source: anyhow::anyhow!("pair not in registry"),
    })?;
    let buy = lookup_venue(&pair, &opportunity.buy_venue).ok_or_else(|| {
        EngineError::DataParsing {
            context: format!("route buy venue {} not registered", opportunity.buy_venue),
            source: anyhow::anyhow!("venue not in registry"),
        }
    })?;
    let sell = lookup_venue(&pair, &opportunity.sell_venue).ok_or_else(|| {
        EngineError::DataParsing {
            context: format!("route sell venue {} not registered", opportunity.sell_venue),
            source: anyhow::anyhow!("venue not in registry"),
        }
    })?;

    let repay =
        opportunity.loan_amount * (dec!(1) + Decimal::from(LOAN_FEE_BPS) / dec!(10000));
    let min_final = to_raw(repay, asset.decimals).map_err(|e| EngineError::DataParsing {
        context: format!("route minimum for {}", opportunity.id),
        source: e,
    })?;

    Ok((buy.address, sell.address, min_final).abi_encode().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::lookup_asset;
    use chrono::Utc;
    use crate::types::FeeBreakdown;

    fn opportunity(pair: &str, buy: &str, sell: &str) -> ArbitrageOpportunity {
        ArbitrageOpportunity {
            id: "test".into(),
            timestamp: Utc::now(),
            pair: pair.into(),
            buy_venue: buy.into(),
            sell_venue: sell.into(),
            buy_price: dec!(1),
            sell_price: dec!(1.01),
            buy_fee_bps: 30,
            sell_fee_bps: 25,
            loan_amount: dec!(1000),
            gross_profit: dec!(10),
            fees: FeeBreakdown::new(dec!(3), dec!(0.9), dec!(1)),
            net_profit: dec!(5.1),
            confidence: 0.8,
            risk: 0.2,
            priority: 0.9,
            risk_flags: vec![],
        }
    }

    #[test]
    fn route_encodes_for_registered_venues() {
        let asset = lookup_asset("USDC").unwrap();
        let route = encode_route(&opportunity("USDC/WETH", "aeron-v2", "uniswap-v3"), asset).unwrap();
        // Two addresses and a uint256, each one 32-byte word.
        assert_eq!(route.len(), 96);
    }

    #[test]
    fn unknown_venue_is_a_parse_error() {
        let asset = lookup_asset("USDC").unwrap();
        let err = encode_route(&opportunity("USDC/WETH", "nowhere", "uniswap-v3"), asset).unwrap_err();
        assert!(matches!(err, EngineError::DataParsing { .. }));
    }
}
