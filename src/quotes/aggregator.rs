//! Price aggregator: fan-out over every configured venue, fan-in of the
//! quotes that survived
//!
//! Partial completion is the normal case. Venues that fail or time out are
//! omitted; the aggregator itself fails only when fewer than two quotes
//! survive, since arbitrage needs a buy and a sell side.

use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use crate::{
    errors::{EngineError, EngineResult},
    types::{AssetDescriptor, PriceQuote},
};
use super::QuoteSource;

pub struct PriceAggregator {
    adapters: Vec<Arc<dyn QuoteSource>>,
    venue_timeout: Duration,
}

impl PriceAggregator {
    pub fn new(adapters: Vec<Arc<dyn QuoteSource>>, venue_timeout: Duration) -> Self {
        Self { adapters, venue_timeout }
    }

    pub fn venue_count(&self) -> usize {
        self.adapters.len()
    }

    /// Query all venues concurrently with an independent timeout per venue.
    pub async fn gather(
        &self,
        input: &AssetDescriptor,
        output: &AssetDescriptor,
        trial_amount: Decimal,
    ) -> EngineResult<Vec<PriceQuote>> {
        let mut tasks = JoinSet::new();

        for adapter in &self.adapters {
            let adapter = Arc::clone(adapter);
            let input = input.clone();
            let output = output.clone();
            let timeout = self.venue_timeout;
            tasks.spawn(async move {
                let name = adapter.venue().name;
                let result =
                    tokio::time::timeout(timeout, adapter.quote(&input, &output, trial_amount))
                        .await;
                (name, result)
            });
        }

        let mut quotes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let Ok((name, result)) = joined else {
                warn!("Venue query task panicked; omitting venue");
                continue;
            };
            match result {
                Ok(Ok(quote)) => quotes.push(quote),
                Ok(Err(failure)) => {
                    // Venue-local failure, absorbed here and never escalated.
                    let absorbed =
                        EngineError::QuoteUnavailable { venue: name.to_string(), failure };
                    debug!("{}", absorbed);
                }
                Err(_) => {
                    warn!("Venue {} timed out after {:?}", name, self.venue_timeout);
                }
            }
        }

        if quotes.len() < 2 {
            return Err(EngineError::InsufficientQuotes {
                pair: format!("{}/{}", input.symbol, output.symbol),
                got: quotes.len(),
            });
        }

        // Deterministic downstream ordering regardless of completion order.
        quotes.sort_by(|a, b| a.venue.cmp(&b.venue));
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use crate::errors::QuoteFailure;
    use crate::types::{FeeSchedule, VenueDescriptor, VenueKind};
    use alloy::primitives::Address;

    enum StubBehavior {
        Quote(Decimal),
        Fail(QuoteFailure),
        Hang,
    }

    struct StubVenue {
        descriptor: VenueDescriptor,
        behavior: StubBehavior,
    }

    fn descriptor(name: &'static str) -> VenueDescriptor {
        VenueDescriptor {
            name,
            address: Address::ZERO,
            kind: VenueKind::ConstantProduct,
            fees: FeeSchedule::FixedBps(30),
            liquidity_quality: 0.8,
        }
    }

    #[async_trait]
    impl QuoteSource for StubVenue {
        fn venue(&self) -> &VenueDescriptor {
            &self.descriptor
        }

        async fn quote(
            &self,
            input: &AssetDescriptor,
            output: &AssetDescriptor,
            amount_in: Decimal,
        ) -> Result<PriceQuote, QuoteFailure> {
            match &self.behavior {
                StubBehavior::Quote(price) => Ok(PriceQuote {
                    venue: self.descriptor.name.to_string(),
                    input_symbol: input.symbol.to_string(),
                    output_symbol: output.symbol.to_string(),
                    amount_in,
                    amount_out: amount_in * price,
                    unit_price: *price,
                    fee_bps: 30,
                    depth: dec!(1000000),
                    captured_at: Utc::now(),
                }),
                StubBehavior::Fail(f) => Err(*f),
                StubBehavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(QuoteFailure::Unreachable)
                }
            }
        }
    }

    fn asset(symbol: &'static str) -> AssetDescriptor {
        use crate::types::{AssetCategory, RiskTier};
        AssetDescriptor {
            symbol,
            address: Address::ZERO,
            decimals: 6,
            risk_tier: RiskTier::Stable,
            category: AssetCategory::Stablecoin,
        }
    }

    fn stub(name: &'static str, behavior: StubBehavior) -> Arc<dyn QuoteSource> {
        Arc::new(StubVenue { descriptor: descriptor(name), behavior })
    }

    #[tokio::test]
    async fn failing_venue_is_omitted_not_fatal() {
        let aggregator = PriceAggregator::new(
            vec![
                stub("a", StubBehavior::Quote(dec!(1.00))),
                stub("b", StubBehavior::Quote(dec!(1.05))),
                stub("c", StubBehavior::Fail(QuoteFailure::NoRoute)),
            ],
            Duration::from_millis(200),
        );
        let quotes = aggregator.gather(&asset("USDC"), &asset("USDbC"), dec!(1000)).await.unwrap();
        assert_eq!(quotes.len(), 2);
    }

    #[tokio::test]
    async fn timeout_leaves_single_quote_and_reports_insufficient() {
        let aggregator = PriceAggregator::new(
            vec![
                stub("a", StubBehavior::Quote(dec!(1.00))),
                stub("b", StubBehavior::Hang),
            ],
            Duration::from_millis(50),
        );
        let result = aggregator.gather(&asset("USDC"), &asset("USDbC"), dec!(1000)).await;
        assert!(matches!(result, Err(EngineError::InsufficientQuotes { got: 1, .. })));
    }

    #[tokio::test]
    async fn quotes_are_sorted_by_venue_name() {
        let aggregator = PriceAggregator::new(
            vec![
                stub("zeta", StubBehavior::Quote(dec!(1.01))),
                stub("alpha", StubBehavior::Quote(dec!(1.02))),
            ],
            Duration::from_millis(200),
        );
        let quotes = aggregator.gather(&asset("USDC"), &asset("USDbC"), dec!(1000)).await.unwrap();
        assert_eq!(quotes[0].venue, "alpha");
        assert_eq!(quotes[1].venue, "zeta");
    }
}
