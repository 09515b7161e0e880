//! Concentrated-liquidity venue adapter
//!
//! Quotes every configured fee tier for the trial amount and keeps the tier
//! with the largest output: greedy best-execution, not first-match.

use alloy::primitives::aliases::{U24, U160};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::debug;
use crate::{
    errors::QuoteFailure,
    types::{AssetDescriptor, PriceQuote, VenueDescriptor},
    utils::{from_raw, to_raw},
    ConcreteProvider,
};
use super::{adapter::classify_call_error, IQuoterV2, QuoteSource};

/// The quoter contract takes the fee tier in hundredths of a bip; the
/// registry stores tiers in bps so the fee model can use them directly.
fn tier_to_contract_units(tier_bps: u32) -> u32 {
    tier_bps * 100
}

pub struct ConcentratedLiquidityAdapter {
    venue: VenueDescriptor,
    provider: Arc<ConcreteProvider>,
    reference_depth: Decimal,
}

impl ConcentratedLiquidityAdapter {
    pub fn new(
        venue: VenueDescriptor,
        provider: Arc<ConcreteProvider>,
        reference_depth: Decimal,
    ) -> Self {
        Self { venue, provider, reference_depth }
    }
}

#[async_trait]
impl QuoteSource for ConcentratedLiquidityAdapter {
    fn venue(&self) -> &VenueDescriptor {
        &self.venue
    }

    async fn quote(
        &self,
        input: &AssetDescriptor,
        output: &AssetDescriptor,
        amount_in: Decimal,
    ) -> Result<PriceQuote, QuoteFailure> {
        let quoter = IQuoterV2::new(self.venue.address, self.provider.as_ref().clone());
        let raw_in = to_raw(amount_in, input.decimals).map_err(|_| QuoteFailure::NoRoute)?;

        let mut best: Option<(u32, Decimal)> = None;
        let mut transport_failures = 0usize;
        let tiers = self.venue.fees.tiers();

        for tier in &tiers {
            let result = quoter
                .quoteExactInputSingle(IQuoterV2::QuoteExactInputSingleParams {
                    tokenIn: input.address,
                    tokenOut: output.address,
                    amountIn: raw_in,
                    fee: U24::from(tier_to_contract_units(*tier)),
                    sqrtPriceLimitX96: U160::ZERO,
                })
                .call()
                .await;

            match result {
                Ok(ret) => {
                    let amount_out = from_raw(ret.amountOut, output.decimals)
                        .map_err(|_| QuoteFailure::StaleChainState)?;
                    if amount_out > dec!(0)
                        && best.map(|(_, out)| amount_out > out).unwrap_or(true)
                    {
                        best = Some((*tier, amount_out));
                    }
                }
                // A reverting tier simply has no pool for the pair.
                Err(e) => match classify_call_error(&e) {
                    QuoteFailure::NoRoute => continue,
                    _ => transport_failures += 1,
                },
            }
        }

        let (fee_bps, amount_out) = match best {
            Some(found) => found,
            None if transport_failures == tiers.len() => return Err(QuoteFailure::Unreachable),
            None => return Err(QuoteFailure::NoRoute),
        };

        debug!(
            "{}: best tier {} bps, {} {} -> {} {}",
            self.venue.name, fee_bps, amount_in, input.symbol, amount_out, output.symbol
        );

        // The quoter call does not expose pool depth; estimate from the
        // venue's static liquidity quality against the configured reference.
        let depth = self.reference_depth
            * Decimal::from_f64(self.venue.liquidity_quality).unwrap_or(Decimal::ONE);

        Ok(PriceQuote {
            venue: self.venue.name.to_string(),
            input_symbol: input.symbol.to_string(),
            output_symbol: output.symbol.to_string(),
            amount_in,
            amount_out,
            unit_price: amount_out / amount_in,
            fee_bps,
            depth,
            captured_at: Utc::now(),
        })
    }
}
