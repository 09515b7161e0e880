//! Constant-product (x*y=k) venue adapter

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::debug;
use crate::{
    errors::QuoteFailure,
    types::{AssetDescriptor, PriceQuote, VenueDescriptor},
    utils::from_raw,
    ConcreteProvider,
};
use super::{adapter::classify_call_error, IPairPool, QuoteSource};

/// Reserves older than this indicate a pool the chain has not touched for a
/// long time; quoting against them risks executing on dead liquidity.
const RESERVE_STALENESS_SECS: i64 = 3600;

pub struct ConstantProductAdapter {
    venue: VenueDescriptor,
    provider: Arc<ConcreteProvider>,
}

impl ConstantProductAdapter {
    pub fn new(venue: VenueDescriptor, provider: Arc<ConcreteProvider>) -> Self {
        Self { venue, provider }
    }
}

/// Swap output under x*y=k with the fee taken from the input side.
pub fn amount_out_constant_product(
    reserve_in: Decimal,
    reserve_out: Decimal,
    amount_in: Decimal,
    fee_bps: u32,
) -> Decimal {
    let effective_in = amount_in * (dec!(1) - Decimal::from(fee_bps) / dec!(10000));
    (reserve_out * effective_in) / (reserve_in + effective_in)
}

#[async_trait]
impl QuoteSource for ConstantProductAdapter {
    fn venue(&self) -> &VenueDescriptor {
        &self.venue
    }

    async fn quote(
        &self,
        input: &AssetDescriptor,
        output: &AssetDescriptor,
        amount_in: Decimal,
    ) -> Result<PriceQuote, QuoteFailure> {
        let pool = IPairPool::new(self.venue.address, self.provider.as_ref().clone());

        let reserves = pool
            .getReserves()
            .call()
            .await
            .map_err(|e| classify_call_error(&e))?;
        let token0 = pool
            .token0()
            .call()
            .await
            .map_err(|e| classify_call_error(&e))?
            .token;

        let (raw_in, raw_out) = if token0 == input.address {
            (reserves.reserve0, reserves.reserve1)
        } else if token0 == output.address {
            (reserves.reserve1, reserves.reserve0)
        } else {
            return Err(QuoteFailure::NoRoute);
        };

        let last_update: i64 = reserves.blockTimestampLast.to::<u64>() as i64;
        if last_update > 0 && Utc::now().timestamp() - last_update > RESERVE_STALENESS_SECS {
            return Err(QuoteFailure::StaleChainState);
        }

        let reserve_in =
            from_raw(raw_in, input.decimals).map_err(|_| QuoteFailure::StaleChainState)?;
        let reserve_out =
            from_raw(raw_out, output.decimals).map_err(|_| QuoteFailure::StaleChainState)?;

        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(QuoteFailure::NoRoute);
        }

        let fee_bps = self.venue.fees.tiers()[0];
        let amount_out = amount_out_constant_product(reserve_in, reserve_out, amount_in, fee_bps);
        if amount_out <= dec!(0) {
            return Err(QuoteFailure::NoRoute);
        }

        debug!(
            "{}: {} {} -> {} {} (depth {})",
            self.venue.name, amount_in, input.symbol, amount_out, output.symbol, reserve_in
        );

        Ok(PriceQuote {
            venue: self.venue.name.to_string(),
            input_symbol: input.symbol.to_string(),
            output_symbol: output.symbol.to_string(),
            amount_in,
            amount_out,
            unit_price: amount_out / amount_in,
            fee_bps,
            depth: reserve_in,
            captured_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_trade_tracks_spot_price_minus_fee() {
        // Deep pool at 1:3000, tiny trade, 30 bps fee.
        let out = amount_out_constant_product(dec!(10000), dec!(30000000), dec!(1), 30);
        assert!(out > dec!(2990) && out < dec!(2998), "out = {out}");
    }

    #[test]
    fn large_trade_suffers_price_impact() {
        let small = amount_out_constant_product(dec!(10000), dec!(30000000), dec!(1), 30);
        let large = amount_out_constant_product(dec!(10000), dec!(30000000), dec!(1000), 30);
        assert!(large / dec!(1000) < small, "per-unit output must degrade with size");
    }

    #[test]
    fn zero_fee_conserves_invariant() {
        let r_in = dec!(500000);
        let r_out = dec!(500000);
        let out = amount_out_constant_product(r_in, r_out, dec!(1000), 0);
        let k_before = r_in * r_out;
        let k_after = (r_in + dec!(1000)) * (r_out - out);
        let drift = ((k_after - k_before) / k_before).abs();
        assert!(drift < dec!(0.0000001), "invariant drift {drift}");
    }
}
