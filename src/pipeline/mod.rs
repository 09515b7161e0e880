//! Execution pipeline
//!
//! Orchestrates a full decision cycle: gather quotes, rank opportunities,
//! vet each candidate against freshness, the circuit breaker, and loan
//! liquidity, then hand survivors to the executor and feed the outcome back
//! into the breaker and score calibration.

use rust_decimal::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

use alloy::signers::local::PrivateKeySigner;
use std::str::FromStr;

use crate::{
    config::Config,
    errors::{BreakerKey, BreakerStatus, CircuitBreakerRegistry, EngineError, EngineResult},
    execution::Executor,
    fees::mid_price,
    liquidity::{confirm_loan_liquidity, LoanLiquidity},
    network::GasOracle,
    quotes::{adapter_for, PriceAggregator},
    scanner::{rank_opportunities, ScanParams},
    scoring::{ScoreCalibration, VolatilityTracker},
    storage::{save_execution, save_opportunity, save_rejection},
    types::{
        lookup_asset, parse_pair, venues_for, ArbitrageOpportunity, AssetPair,
        ExecuteDisposition, ExecutionOutcome, Rejection, VenuePair,
    },
    ConcreteProvider,
};

const VOLATILITY_WINDOW_SECS: u64 = 300;

/// One price aggregator per registered pair, wired to real venue adapters.
pub fn venue_aggregators(
    provider: Arc<ConcreteProvider>,
    config: &Config,
) -> HashMap<AssetPair, PriceAggregator> {
    let timeout = Duration::from_secs(config.venue_timeout_secs);
    crate::types::PAIRS
        .iter()
        .map(|pair| {
            let adapters = venues_for(pair)
                .into_iter()
                .map(|venue| adapter_for(venue, Arc::clone(&provider), config))
                .collect();
            (*pair, PriceAggregator::new(adapters, timeout))
        })
        .collect()
}

pub struct ExecutionPipeline {
    config: Config,
    aggregators: HashMap<AssetPair, PriceAggregator>,
    gas_oracle: Arc<GasOracle>,
    breakers: CircuitBreakerRegistry,
    calibration: ScoreCalibration,
    gatekeeper: Arc<dyn LoanLiquidity>,
    executor: Arc<dyn Executor>,
    /// Present in live deployments; used only for the on-chain breaker reset.
    provider: Option<Arc<ConcreteProvider>>,
    volatility: Mutex<VolatilityTracker>,
    queue: Mutex<VecDeque<ArbitrageOpportunity>>,
}

impl ExecutionPipeline {
    pub fn new(
        config: Config,
        aggregators: HashMap<AssetPair, PriceAggregator>,
        gas_oracle: Arc<GasOracle>,
        gatekeeper: Arc<dyn LoanLiquidity>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        let breakers = CircuitBreakerRegistry::new(config.breaker_threshold);
        Self {
            config,
            aggregators,
            gas_oracle,
            breakers,
            calibration: ScoreCalibration::new(),
            gatekeeper,
            executor,
            provider: None,
            volatility: Mutex::new(VolatilityTracker::new(VOLATILITY_WINDOW_SECS)),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_provider(mut self, provider: Arc<ConcreteProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// One scan cycle for a pair: quotes in, ranked opportunities out.
    pub async fn scan(&self, pair: &AssetPair) -> EngineResult<Vec<ArbitrageOpportunity>> {
        let aggregator = self.aggregators.get(pair).ok_or_else(|| {
            EngineError::InsufficientQuotes { pair: pair.to_string(), got: 0 }
        })?;
        let base = lookup_asset(pair.base).ok_or_else(|| EngineError::DataParsing {
            context: format!("unregistered base asset {}", pair.base),
            source: anyhow::anyhow!("asset not in registry"),
        })?;
        let quote_asset = lookup_asset(pair.quote).ok_or_else(|| EngineError::DataParsing {
            context: format!("unregistered quote asset {}", pair.quote),
            source: anyhow::anyhow!("asset not in registry"),
        })?;

        let quotes = aggregator.gather(base, quote_asset, self.config.trial_amount).await?;
        // Fee math is refused outright without a live gas snapshot.
        let snapshot = self.gas_oracle.current().await?;

        let volatility_pct = {
            let mut tracker = self.volatility.lock().await;
            let mean_mid = quotes.iter().map(mid_price).sum::<Decimal>()
                / Decimal::from(quotes.len() as u64);
            if let Some(sample) = mean_mid.to_f64() {
                tracker.add_sample(sample);
            }
            tracker.volatility_pct()
        };

        let venues = venues_for(pair);
        let mut venue_reliability = HashMap::new();
        for venue in &venues {
            venue_reliability
                .insert(venue.name.to_string(), self.calibration.reliability_for(venue.name).await);
        }

        let params = ScanParams {
            cap_fraction: self.config.cap_fraction,
            max_trade_size: self.config.max_trade_size,
            min_trade_size: crate::config::settings::MIN_TRADE_SIZE,
            min_profit: self.config.min_profit_usd,
            max_profit: self.config.max_profit_usd,
            freshness_secs: self.config.quote_freshness_secs,
            top_n: self.config.max_ranked_opportunities,
            venue_reliability,
            volatility_pct,
            tier_weight: quote_asset.risk_tier.weight(),
            now: chrono::Utc::now(),
        };

        let ranked = rank_opportunities(pair, &quotes, &venues, &snapshot, &params);
        info!(
            "🔍 Scan {}: {} of {} venue(s) quoted, {} ranked opportunity(ies)",
            pair,
            quotes.len(),
            aggregator.venue_count(),
            ranked.len()
        );
        for opportunity in &ranked {
            if let Err(e) = save_opportunity(opportunity) {
                warn!("Failed to persist opportunity {}: {}", opportunity.id, e);
            }
        }
        Ok(ranked)
    }

    /// Vet and execute one opportunity. Vet failures are structured
    /// rejections, not errors; only infrastructure and fatal signer problems
    /// surface as `Err`.
    pub async fn execute(
        &self,
        opportunity: &ArbitrageOpportunity,
    ) -> EngineResult<ExecuteDisposition> {
        let now = chrono::Utc::now();
        let max_age = self.config.quote_freshness_secs;
        if !opportunity.is_fresh(now, max_age) {
            let reason = EngineError::StalePrice {
                opportunity_id: opportunity.id.clone(),
                age_secs: opportunity.age_secs(now),
                max_secs: max_age,
            };
            return Ok(self.reject(opportunity, reason.to_string()));
        }

        let pair = parse_pair(&opportunity.pair).ok_or_else(|| EngineError::DataParsing {
            context: format!("opportunity for unregistered pair {}", opportunity.pair),
            source: anyhow::anyhow!("pair not in registry"),
        })?;
        let asset = lookup_asset(pair.base).ok_or_else(|| EngineError::DataParsing {
            context: format!("unregistered borrow asset {}", pair.base),
            source: anyhow::anyhow!("asset not in registry"),
        })?;

        // Breaker check comes before any chain interaction.
        let key = BreakerKey::new(
            asset.symbol,
            VenuePair::new(&opportunity.buy_venue, &opportunity.sell_venue),
        );
        if self.breakers.is_open(&key).await {
            let status = self.breakers.status(&key).await;
            let reason = EngineError::CircuitOpen {
                key: key.to_string(),
                failures: status.failures,
            };
            return Ok(self.reject(opportunity, reason.to_string()));
        }

        match confirm_loan_liquidity(self.gatekeeper.as_ref(), asset, opportunity.loan_amount)
            .await
        {
            Ok(_) => {}
            Err(EngineError::LiquidityUnconfirmed { reason, .. }) => {
                return Ok(self.reject(
                    opportunity,
                    format!("loan liquidity unconfirmed for {}: {}", asset.symbol, reason),
                ));
            }
            Err(other) => return Err(other),
        }

        let result = self.executor.execute(opportunity, asset).await?;
        if let Err(e) = save_execution(&result) {
            warn!("Failed to persist execution {}: {}", result.id, e);
        }

        if !result.dry_run {
            match result.outcome {
                ExecutionOutcome::Success => {
                    self.breakers.record_success(&key).await;
                    self.calibration
                        .record_outcome(&opportunity.buy_venue, &opportunity.sell_venue, true)
                        .await;
                }
                ExecutionOutcome::Reverted => {
                    self.breakers.record_failure(&key).await;
                    self.calibration
                        .record_outcome(&opportunity.buy_venue, &opportunity.sell_venue, false)
                        .await;
                }
                ExecutionOutcome::TimedOut => {
                    // Counts toward the breaker like a revert. Calibration
                    // only moves on definitive outcomes. The nonce reservation
                    // stays held: the pending transaction may still mine, so
                    // further submissions refuse with a fatal signer error
                    // until an operator confirms its fate and resyncs.
                    self.breakers.record_failure(&key).await;
                }
            }
        }

        Ok(ExecuteDisposition::Completed(result))
    }

    fn reject(&self, opportunity: &ArbitrageOpportunity, reason: String) -> ExecuteDisposition {
        info!("🚫 Rejected {}: {}", opportunity.id, reason);
        let rejection = Rejection::new(&opportunity.id, reason);
        if let Err(e) = save_rejection(&rejection) {
            warn!("Failed to persist rejection for {}: {}", opportunity.id, e);
        }
        ExecuteDisposition::Rejected(rejection)
    }

    /// Queue ranked opportunities for execution in priority order. Each one
    /// is re-vetted when its turn comes, so queueing never bypasses
    /// freshness or breaker checks.
    pub async fn enqueue(&self, opportunities: Vec<ArbitrageOpportunity>) {
        let mut queue = self.queue.lock().await;
        queue.extend(opportunities);
    }

    pub async fn execute_next(&self) -> Option<EngineResult<ExecuteDisposition>> {
        let next = self.queue.lock().await.pop_front()?;
        Some(self.execute(&next).await)
    }

    pub async fn queued(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn circuit_breaker_status(&self, key: &BreakerKey) -> BreakerStatus {
        self.breakers.status(key).await
    }

    /// Operator action after a timed-out submission: re-read the chain's
    /// nonce and release the held reservation. Never invoked automatically;
    /// the operator confirms the pending transaction mined or was evicted
    /// before calling this.
    pub async fn resync_signer(&self) -> EngineResult<()> {
        self.executor.resync().await
    }

    /// Reset a tripped breaker. The presented authorization must match the
    /// configured owner credential; with a live provider the reset is also
    /// submitted on-chain, where the contract enforces ownership itself.
    pub async fn reset_circuit_breaker(
        &self,
        key: &BreakerKey,
        authorization: &str,
    ) -> EngineResult<bool> {
        let configured = self.config.owner_key.as_ref().ok_or_else(|| EngineError::Signer {
            message: "owner credential required to reset a circuit breaker".into(),
        })?;
        let owner = PrivateKeySigner::from_str(configured).map_err(|e| EngineError::Signer {
            message: format!("configured owner credential rejected: {e}"),
        })?;
        let presented =
            PrivateKeySigner::from_str(authorization).map_err(|e| EngineError::Signer {
                message: format!("reset authorization rejected: {e}"),
            })?;
        if presented.address() != owner.address() {
            return Err(EngineError::Signer {
                message: "reset authorization does not match the owner".into(),
            });
        }

        if let Some(provider) = &self.provider {
            crate::execution::submit_breaker_reset(
                provider,
                &presented,
                key,
                self.config.max_gas_price_gwei,
            )
            .await?;
        }
        Ok(self.breakers.reset(key).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    use crate::errors::EngineResult;
    use crate::network::GasSnapshot;
    use crate::types::{AssetDescriptor, ExecutionResult, FeeBreakdown};

    struct ScriptedExecutor {
        outcomes: Mutex<VecDeque<ExecutionOutcome>>,
        calls: AtomicUsize,
    }

    impl ScriptedExecutor {
        fn new(outcomes: Vec<ExecutionOutcome>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Executor for ScriptedExecutor {
        fn is_dry_run(&self) -> bool {
            false
        }

        async fn execute(
            &self,
            opportunity: &ArbitrageOpportunity,
            _asset: &AssetDescriptor,
        ) -> EngineResult<ExecutionResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self
                .outcomes
                .lock()
                .await
                .pop_front()
                .unwrap_or(ExecutionOutcome::Success);
            Ok(ExecutionResult {
                id: Uuid::new_v4().to_string(),
                opportunity_id: opportunity.id.clone(),
                outcome,
                tx_hash: Some("0xstub".into()),
                gas_used: Some(400_000),
                expected_profit: opportunity.net_profit,
                realized_profit: None,
                error: None,
                submitted_at: Utc::now(),
                confirmed_at: Some(Utc::now()),
                dry_run: false,
            })
        }
    }

    struct AmpleLiquidity;

    #[async_trait]
    impl LoanLiquidity for AmpleLiquidity {
        async fn available(&self, _asset: &AssetDescriptor) -> EngineResult<Decimal> {
            Ok(dec!(10000000))
        }
    }

    struct DryProvider;

    #[async_trait]
    impl LoanLiquidity for DryProvider {
        async fn available(&self, _asset: &AssetDescriptor) -> EngineResult<Decimal> {
            Ok(dec!(1))
        }
    }

    fn config() -> Config {
        Config::load()
    }

    fn pipeline_with(
        executor: Arc<dyn Executor>,
        gatekeeper: Arc<dyn LoanLiquidity>,
    ) -> ExecutionPipeline {
        ExecutionPipeline::new(
            config(),
            HashMap::new(),
            Arc::new(GasOracle::new()),
            gatekeeper,
            executor,
        )
    }

    fn opportunity() -> ArbitrageOpportunity {
        ArbitrageOpportunity {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            pair: "USDC/USDbC".into(),
            buy_venue: "aeron-v2".into(),
            sell_venue: "uniswap-v3".into(),
            buy_price: dec!(1.000),
            sell_price: dec!(1.008),
            buy_fee_bps: 5,
            sell_fee_bps: 1,
            loan_amount: dec!(1000),
            gross_profit: dec!(8),
            fees: FeeBreakdown::new(dec!(0.6), dec!(0.9), dec!(0.2)),
            net_profit: dec!(6.3),
            confidence: 0.8,
            risk: 0.15,
            priority: 0.9,
            risk_flags: vec![],
        }
    }

    fn reason_of(disposition: &ExecuteDisposition) -> &str {
        match disposition {
            ExecuteDisposition::Rejected(r) => &r.reason,
            ExecuteDisposition::Completed(_) => panic!("expected rejection"),
        }
    }

    #[tokio::test]
    async fn stale_opportunity_never_reaches_the_executor() {
        let executor = ScriptedExecutor::new(vec![]);
        let pipeline = pipeline_with(executor.clone(), Arc::new(AmpleLiquidity));

        let mut opp = opportunity();
        opp.timestamp = Utc::now() - ChronoDuration::seconds(120);
        let disposition = pipeline.execute(&opp).await.unwrap();
        assert!(reason_of(&disposition).contains("Stale price"));
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn three_reverts_trip_the_breaker_and_the_fourth_is_vetoed() {
        let executor = ScriptedExecutor::new(vec![
            ExecutionOutcome::Reverted,
            ExecutionOutcome::Reverted,
            ExecutionOutcome::Reverted,
        ]);
        let pipeline = pipeline_with(executor.clone(), Arc::new(AmpleLiquidity));

        for _ in 0..3 {
            let disposition = pipeline.execute(&opportunity()).await.unwrap();
            assert!(matches!(disposition, ExecuteDisposition::Completed(_)));
        }
        assert_eq!(executor.calls(), 3);

        // Fourth attempt on the same (asset, venue-pair) key is rejected
        // before the executor ever runs.
        let disposition = pipeline.execute(&opportunity()).await.unwrap();
        assert!(reason_of(&disposition).contains("Circuit breaker open"));
        assert_eq!(executor.calls(), 3);

        // The reversed venue ordering maps to the same breaker key.
        let mut swapped = opportunity();
        std::mem::swap(&mut swapped.buy_venue, &mut swapped.sell_venue);
        let disposition = pipeline.execute(&swapped).await.unwrap();
        assert!(reason_of(&disposition).contains("Circuit breaker open"));
    }

    #[tokio::test]
    async fn liquidity_shortfall_is_a_structured_rejection() {
        let executor = ScriptedExecutor::new(vec![]);
        let pipeline = pipeline_with(executor.clone(), Arc::new(DryProvider));

        let disposition = pipeline.execute(&opportunity()).await.unwrap();
        assert!(reason_of(&disposition).contains("loan liquidity unconfirmed"));
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn timed_out_execution_counts_toward_the_breaker() {
        let executor = ScriptedExecutor::new(vec![ExecutionOutcome::TimedOut]);
        let pipeline = pipeline_with(executor.clone(), Arc::new(AmpleLiquidity));

        let opp = opportunity();
        let disposition = pipeline.execute(&opp).await.unwrap();
        assert!(matches!(disposition, ExecuteDisposition::Completed(_)));

        let key = BreakerKey::new("USDC", VenuePair::new("aeron-v2", "uniswap-v3"));
        assert_eq!(pipeline.circuit_breaker_status(&key).await.failures, 1);
    }

    /// Executor that reserves nonces through real signer accounting and
    /// times out on its first submission, leaving the reservation held.
    struct NonceHoldingExecutor {
        signer: Arc<Mutex<crate::execution::SignerState>>,
        chain_nonce: u64,
        nonces: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl Executor for NonceHoldingExecutor {
        fn is_dry_run(&self) -> bool {
            false
        }

        async fn execute(
            &self,
            opportunity: &ArbitrageOpportunity,
            _asset: &AssetDescriptor,
        ) -> EngineResult<ExecutionResult> {
            let mut signer = self.signer.lock().await;
            let nonce = signer.begin()?;
            self.nonces.lock().await.push(nonce);
            // Receipt never arrives; the reservation stays held.
            Ok(ExecutionResult {
                id: Uuid::new_v4().to_string(),
                opportunity_id: opportunity.id.clone(),
                outcome: ExecutionOutcome::TimedOut,
                tx_hash: Some("0xstub".into()),
                gas_used: None,
                expected_profit: opportunity.net_profit,
                realized_profit: None,
                error: Some("no receipt".into()),
                submitted_at: Utc::now(),
                confirmed_at: None,
                dry_run: false,
            })
        }

        async fn resync(&self) -> EngineResult<()> {
            self.signer.lock().await.resync(self.chain_nonce);
            Ok(())
        }
    }

    #[tokio::test]
    async fn timeout_holds_the_nonce_until_an_operator_resync() {
        use alloy::primitives::Address;

        // Chain nonce 8 models the timed-out nonce-7 transaction having
        // eventually mined; the operator verifies that before resyncing.
        let executor = Arc::new(NonceHoldingExecutor {
            signer: crate::execution::SignerState::shared(Address::ZERO, 7),
            chain_nonce: 8,
            nonces: Mutex::new(Vec::new()),
        });
        let pipeline = pipeline_with(executor.clone(), Arc::new(AmpleLiquidity));

        pipeline.enqueue(vec![opportunity(), opportunity()]).await;

        let first = pipeline.execute_next().await.unwrap().unwrap();
        assert!(matches!(first, ExecuteDisposition::Completed(_)));

        // The next queued opportunity must not go out with the same nonce;
        // it surfaces the fatal signer error instead.
        let second = pipeline.execute_next().await.unwrap().unwrap_err();
        assert!(second.is_fatal());
        assert_eq!(*executor.nonces.lock().await, vec![7]);

        // Only an explicit operator resync releases the reservation.
        pipeline.resync_signer().await.unwrap();
        pipeline.enqueue(vec![opportunity()]).await;
        pipeline.execute_next().await.unwrap().unwrap();
        assert_eq!(*executor.nonces.lock().await, vec![7, 8]);
    }

    const OWNER_KEY: &str =
        "0x0000000000000000000000000000000000000000000000000000000000000001";
    const OTHER_KEY: &str =
        "0x0000000000000000000000000000000000000000000000000000000000000002";

    async fn tripped_pipeline(owner_key: Option<String>) -> (ExecutionPipeline, BreakerKey) {
        let executor = ScriptedExecutor::new(vec![
            ExecutionOutcome::Reverted,
            ExecutionOutcome::Reverted,
            ExecutionOutcome::Reverted,
        ]);
        let mut cfg = config();
        cfg.owner_key = owner_key;
        let pipeline = ExecutionPipeline::new(
            cfg,
            HashMap::new(),
            Arc::new(GasOracle::new()),
            Arc::new(AmpleLiquidity),
            executor,
        );
        for _ in 0..3 {
            pipeline.execute(&opportunity()).await.unwrap();
        }
        let key = BreakerKey::new("USDC", VenuePair::new("aeron-v2", "uniswap-v3"));
        assert!(pipeline.breakers.is_open(&key).await);
        (pipeline, key)
    }

    #[tokio::test]
    async fn breaker_reset_requires_a_configured_owner() {
        let (pipeline, key) = tripped_pipeline(None).await;
        let err = pipeline.reset_circuit_breaker(&key, OWNER_KEY).await.unwrap_err();
        assert!(matches!(err, EngineError::Signer { .. }));
        assert!(pipeline.breakers.is_open(&key).await);
    }

    #[tokio::test]
    async fn breaker_reset_rejects_a_mismatched_authorization() {
        let (pipeline, key) = tripped_pipeline(Some(OWNER_KEY.to_string())).await;
        let err = pipeline.reset_circuit_breaker(&key, OTHER_KEY).await.unwrap_err();
        assert!(matches!(err, EngineError::Signer { .. }));
        assert!(pipeline.breakers.is_open(&key).await);
    }

    #[tokio::test]
    async fn authorized_reset_closes_the_breaker() {
        let (pipeline, key) = tripped_pipeline(Some(OWNER_KEY.to_string())).await;
        assert!(pipeline.reset_circuit_breaker(&key, OWNER_KEY).await.unwrap());
        assert!(!pipeline.breakers.is_open(&key).await);
    }

    #[tokio::test]
    async fn queued_opportunities_are_revalidated_on_their_turn() {
        let executor = ScriptedExecutor::new(vec![]);
        let pipeline = pipeline_with(executor.clone(), Arc::new(AmpleLiquidity));

        let fresh = opportunity();
        let mut stale = opportunity();
        stale.timestamp = Utc::now() - ChronoDuration::seconds(120);
        pipeline.enqueue(vec![fresh, stale]).await;
        assert_eq!(pipeline.queued().await, 2);

        let first = pipeline.execute_next().await.unwrap().unwrap();
        assert!(matches!(first, ExecuteDisposition::Completed(_)));
        let second = pipeline.execute_next().await.unwrap().unwrap();
        assert!(reason_of(&second).contains("Stale price"));
        assert!(pipeline.execute_next().await.is_none());
    }

    struct FixedPriceVenue {
        descriptor: crate::types::VenueDescriptor,
        mid: Decimal,
        fee_bps: u32,
    }

    #[async_trait]
    impl crate::quotes::QuoteSource for FixedPriceVenue {
        fn venue(&self) -> &crate::types::VenueDescriptor {
            &self.descriptor
        }

        async fn quote(
            &self,
            input: &AssetDescriptor,
            output: &AssetDescriptor,
            amount_in: Decimal,
        ) -> Result<crate::types::PriceQuote, crate::errors::QuoteFailure> {
            let effective_in =
                amount_in * (dec!(1) - Decimal::from(self.fee_bps) / dec!(10000));
            let amount_out = effective_in / self.mid;
            Ok(crate::types::PriceQuote {
                venue: self.descriptor.name.to_string(),
                input_symbol: input.symbol.to_string(),
                output_symbol: output.symbol.to_string(),
                amount_in,
                amount_out,
                unit_price: amount_out / amount_in,
                fee_bps: self.fee_bps,
                depth: dec!(1000000),
                captured_at: Utc::now(),
            })
        }
    }

    fn fixed_venue(name: &'static str, mid: Decimal, fee_bps: u32) -> Arc<dyn crate::quotes::QuoteSource> {
        use crate::types::{FeeSchedule, VenueDescriptor, VenueKind};
        use alloy::primitives::Address;
        Arc::new(FixedPriceVenue {
            descriptor: VenueDescriptor {
                name,
                address: Address::ZERO,
                kind: VenueKind::ConstantProduct,
                fees: FeeSchedule::FixedBps(fee_bps),
                liquidity_quality: 0.8,
            },
            mid,
            fee_bps,
        })
    }

    fn scan_pipeline(gas_oracle: Arc<GasOracle>) -> ExecutionPipeline {
        let pair = AssetPair { base: "USDC", quote: "USDbC" };
        let aggregator = crate::quotes::PriceAggregator::new(
            vec![
                fixed_venue("aeron-v2", dec!(1.000), 5),
                fixed_venue("uniswap-v3", dec!(1.006), 1),
            ],
            Duration::from_millis(500),
        );
        let mut cfg = config();
        cfg.max_trade_size = dec!(2000);
        ExecutionPipeline::new(
            cfg,
            HashMap::from([(pair, aggregator)]),
            gas_oracle,
            Arc::new(AmpleLiquidity),
            ScriptedExecutor::new(vec![]),
        )
    }

    #[tokio::test]
    async fn scan_refuses_without_a_gas_snapshot() {
        let pipeline = scan_pipeline(Arc::new(GasOracle::new()));
        let pair = AssetPair { base: "USDC", quote: "USDbC" };
        let result = pipeline.scan(&pair).await;
        assert!(matches!(result, Err(EngineError::GasPriceUnavailable)));
    }

    #[tokio::test]
    async fn scan_ranks_a_cross_venue_spread() {
        let oracle = Arc::new(GasOracle::new());
        oracle
            .install(GasSnapshot {
                gas_price_wei: 400_000_000,
                native_usd: dec!(1000),
                fetched_at: std::time::Instant::now(),
            })
            .await;
        let pipeline = scan_pipeline(oracle);
        let pair = AssetPair { base: "USDC", quote: "USDbC" };
        let ranked = pipeline.scan(&pair).await.unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].buy_venue, "aeron-v2");
        assert_eq!(ranked[0].sell_venue, "uniswap-v3");
        assert!(ranked[0].net_profit >= dec!(4) && ranked[0].net_profit <= dec!(30));
    }
}
