//! Weighted-pool venue adapter
//!
//! Out-given-in over pool balances and normalized weights:
//! `out = B_out * (1 - (B_in / (B_in + in * (1 - fee)))^(w_in / w_out))`.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::debug;
use crate::{
    errors::QuoteFailure,
    types::{AssetDescriptor, PriceQuote, VenueDescriptor},
    utils::from_raw,
    ConcreteProvider,
};
use super::{adapter::classify_call_error, IWeightedPool, QuoteSource};

pub struct WeightedPoolAdapter {
    venue: VenueDescriptor,
    provider: Arc<ConcreteProvider>,
}

impl WeightedPoolAdapter {
    pub fn new(venue: VenueDescriptor, provider: Arc<ConcreteProvider>) -> Self {
        Self { venue, provider }
    }
}

/// Weighted-pool swap output. The power term runs in f64; weighted pools are
/// the least precise venue here and the scanner treats quotes as estimates.
pub fn amount_out_weighted(
    balance_in: Decimal,
    balance_out: Decimal,
    weight_in: f64,
    weight_out: f64,
    amount_in: Decimal,
    fee_bps: u32,
) -> Option<Decimal> {
    if weight_in <= 0.0 || weight_out <= 0.0 {
        return None;
    }
    let effective_in = amount_in * (dec!(1) - Decimal::from(fee_bps) / dec!(10000));
    let base = (balance_in / (balance_in + effective_in)).to_f64()?;
    let ratio = 1.0 - base.powf(weight_in / weight_out);
    let out = balance_out * Decimal::from_f64(ratio)?;
    (out > dec!(0)).then_some(out)
}

#[async_trait]
impl QuoteSource for WeightedPoolAdapter {
    fn venue(&self) -> &VenueDescriptor {
        &self.venue
    }

    async fn quote(
        &self,
        input: &AssetDescriptor,
        output: &AssetDescriptor,
        amount_in: Decimal,
    ) -> Result<PriceQuote, QuoteFailure> {
        let pool = IWeightedPool::new(self.venue.address, self.provider.as_ref().clone());

        let balance_in = pool
            .getBalance(input.address)
            .call()
            .await
            .map_err(|e| classify_call_error(&e))?
            .balance;
        let balance_out = pool
            .getBalance(output.address)
            .call()
            .await
            .map_err(|e| classify_call_error(&e))?
            .balance;
        let weight_in = pool
            .getNormalizedWeight(input.address)
            .call()
            .await
            .map_err(|e| classify_call_error(&e))?
            .weight;
        let weight_out = pool
            .getNormalizedWeight(output.address)
            .call()
            .await
            .map_err(|e| classify_call_error(&e))?
            .weight;

        let balance_in =
            from_raw(balance_in, input.decimals).map_err(|_| QuoteFailure::StaleChainState)?;
        let balance_out =
            from_raw(balance_out, output.decimals).map_err(|_| QuoteFailure::StaleChainState)?;
        if balance_in.is_zero() || balance_out.is_zero() {
            return Err(QuoteFailure::NoRoute);
        }

        // Normalized weights are 1e18-scaled fractions.
        let weight_in = from_raw(weight_in, 18)
            .ok()
            .and_then(|w| w.to_f64())
            .ok_or(QuoteFailure::StaleChainState)?;
        let weight_out = from_raw(weight_out, 18)
            .ok()
            .and_then(|w| w.to_f64())
            .ok_or(QuoteFailure::StaleChainState)?;

        let fee_bps = self.venue.fees.tiers()[0];
        let amount_out =
            amount_out_weighted(balance_in, balance_out, weight_in, weight_out, amount_in, fee_bps)
                .ok_or(QuoteFailure::NoRoute)?;

        debug!(
            "{}: {} {} -> {} {} (weights {:.2}/{:.2})",
            self.venue.name, amount_in, input.symbol, amount_out, output.symbol,
            weight_in, weight_out
        );

        Ok(PriceQuote {
            venue: self.venue.name.to_string(),
            input_symbol: input.symbol.to_string(),
            output_symbol: output.symbol.to_string(),
            amount_in,
            amount_out,
            unit_price: amount_out / amount_in,
            fee_bps,
            depth: balance_in,
            captured_at: Utc::now(),
        })
    }
}
