//! Dry-run executor
//!
//! Walks the same vetting path as live execution but never touches a key or
//! the mempool. Every record it produces is labeled as a dry run so audit
//! output cannot be mistaken for settled trades.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;
use uuid::Uuid;

use crate::{
    errors::EngineResult,
    execution::{encode_route, Executor},
    types::{ArbitrageOpportunity, AssetDescriptor, ExecutionOutcome, ExecutionResult},
};

pub struct DryRunExecutor {
    slippage_tolerance_bps: u32,
}

impl DryRunExecutor {
    pub fn new(slippage_tolerance_bps: u32) -> Self {
        Self { slippage_tolerance_bps }
    }
}

#[async_trait]
impl Executor for DryRunExecutor {
    fn is_dry_run(&self) -> bool {
        true
    }

    async fn execute(
        &self,
        opportunity: &ArbitrageOpportunity,
        asset: &AssetDescriptor,
    ) -> EngineResult<ExecutionResult> {
        // Exercise route encoding so dry runs catch registry gaps too.
        let route = encode_route(opportunity, asset)?;

        let haircut = dec!(1) - Decimal::from(self.slippage_tolerance_bps) / dec!(10000);
        let realized = opportunity.net_profit * haircut;

        info!(
            "🧪 DRY RUN: would execute {} ({} -> {}, {} {} borrowed, {} byte route)",
            opportunity.id,
            opportunity.buy_venue,
            opportunity.sell_venue,
            opportunity.loan_amount,
            asset.symbol,
            route.len()
        );

        Ok(ExecutionResult {
            id: Uuid::new_v4().to_string(),
            opportunity_id: opportunity.id.clone(),
            outcome: ExecutionOutcome::Success,
            tx_hash: None,
            gas_used: None,
            expected_profit: opportunity.net_profit,
            realized_profit: Some(realized),
            error: None,
            submitted_at: Utc::now(),
            confirmed_at: Some(Utc::now()),
            dry_run: true,
        })
    }
}
