//! Quote source adapter contract
//!
//! One adapter per liquidity venue. Adapters are read-only: they never
//! mutate chain state and never escalate a missing route as an error.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use crate::{
    config::Config,
    errors::QuoteFailure,
    types::{AssetDescriptor, PriceQuote, VenueDescriptor, VenueKind},
    ConcreteProvider,
};
use super::{
    concentrated::ConcentratedLiquidityAdapter, constant_product::ConstantProductAdapter,
    meta_router::MetaRouterAdapter, weighted::WeightedPoolAdapter,
};

#[async_trait]
pub trait QuoteSource: Send + Sync {
    fn venue(&self) -> &VenueDescriptor;

    /// Quote `amount_in` of `input` against this venue. Fails venue-locally
    /// with a `QuoteFailure`; the aggregator decides what that means.
    async fn quote(
        &self,
        input: &AssetDescriptor,
        output: &AssetDescriptor,
        amount_in: Decimal,
    ) -> Result<PriceQuote, QuoteFailure>;
}

/// Build the adapter matching the venue's kind. Exhaustive over `VenueKind`
/// so adding a kind forces a decision here.
pub fn adapter_for(
    venue: VenueDescriptor,
    provider: Arc<ConcreteProvider>,
    config: &Config,
) -> Arc<dyn QuoteSource> {
    match venue.kind {
        VenueKind::ConstantProduct => Arc::new(ConstantProductAdapter::new(venue, provider)),
        VenueKind::ConcentratedLiquidity => Arc::new(ConcentratedLiquidityAdapter::new(
            venue,
            provider,
            config.reference_depth,
        )),
        VenueKind::WeightedPool => Arc::new(WeightedPoolAdapter::new(venue, provider)),
        VenueKind::Aggregator => Arc::new(MetaRouterAdapter::new(
            venue,
            provider,
            config.reference_depth,
        )),
    }
}

/// Map a contract-call failure onto the venue-local taxonomy: a revert means
/// the venue cannot serve the route; anything else is transport trouble.
pub(crate) fn classify_call_error(error: &alloy::contract::Error) -> QuoteFailure {
    match error {
        alloy::contract::Error::TransportError(e) if e.as_error_resp().is_some() => {
            QuoteFailure::NoRoute
        }
        _ => QuoteFailure::Unreachable,
    }
}
