//! Aggregator (meta-router) venue adapter

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
use super::{adapter::classify_call_error, IMetaRouter, QuoteSource};

pub struct MetaRouterAdapter {
    venue: VenueDescriptor,
    provider: Arc<ConcreteProvider>,
    reference_depth: Decimal,
}

impl MetaRouterAdapter {
    pub fn new(
        venue: VenueDescriptor,
        provider: Arc<ConcreteProvider>,
        reference_depth: Decimal,
    ) -> Self {
        Self { venue, provider, reference_depth }
    }
}

#[async_trait]
impl QuoteSource for MetaRouterAdapter {
    fn venue(&self) -> &VenueDescriptor {
        &self.venue
    }

    async fn quote(
        &self,
        input: &AssetDescriptor,
        output: &AssetDescriptor,
        amount_in: Decimal,
    ) -> Result<PriceQuote, QuoteFailure> {
        let router = IMetaRouter::new(self.venue.address, self.provider.as_ref().clone());
        let raw_in = to_raw(amount_in, input.decimals).map_err(|_| QuoteFailure::NoRoute)?;

        let amounts = router
            .getAmountsOut(raw_in, vec![input.address, output.address])
            .call()
            .await
            .map_err(|e| classify_call_error(&e))?
            .amounts;

        let raw_out = amounts.last().copied().ok_or(QuoteFailure::NoRoute)?;
        let amount_out =
            from_raw(raw_out, output.decimals).map_err(|_| QuoteFailure::StaleChainState)?;
        if amount_out <= dec!(0) {
            return Err(QuoteFailure::NoRoute);
        }

        debug!(
            "{}: routed {} {} -> {} {}",
            self.venue.name, amount_in, input.symbol, amount_out, output.symbol
        );

        let depth = self.reference_depth
            * Decimal::from_f64(self.venue.liquidity_quality).unwrap_or(Decimal::ONE);

        Ok(PriceQuote {
            venue: self.venue.name.to_string(),
            input_symbol: input.symbol.to_string(),
            output_symbol: output.symbol.to_string(),
            amount_in,
            amount_out,
            unit_price: amount_out / amount_in,
            fee_bps: self.venue.fees.tiers()[0],
            depth,
            captured_at: Utc::now(),
        })
    }
}
