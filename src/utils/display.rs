//! Display and printing utilities

use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, warn};
use crate::types::{ArbitrageOpportunity, ExecuteDisposition, ExecutionOutcome, ExecutionResult};

pub fn print_opportunity(opp: &ArbitrageOpportunity) {
    info!("💰 Arbitrage opportunity {}", opp.id);
    info!("   Pair: {} | Buy {} @ {:.6} → Sell {} @ {:.6}",
        opp.pair, opp.buy_venue, opp.buy_price, opp.sell_venue, opp.sell_price);
    info!("   Size: {} | Gross: ${:.2} | Fees: ${:.2} (venue ${:.2} + loan ${:.2} + gas ${:.2})",
        opp.loan_amount, opp.gross_profit, opp.fees.total,
        opp.fees.venue_fees, opp.fees.loan_fee, opp.fees.gas_cost);
    info!("   Net: ${:.2} | Confidence: {:.2} | Risk: {:.2} | Priority: {:.3}",
        opp.net_profit, opp.confidence, opp.risk, opp.priority);
    for flag in &opp.risk_flags {
        warn!("   ⚠️  {}", flag);
    }
}

pub fn print_execution_result(result: &ExecutionResult) {
    let label = if result.dry_run { "DRY RUN" } else { "LIVE" };
    match result.outcome {
        ExecutionOutcome::Success => {
            info!("✅ [{}] Execution {} confirmed: tx={:?} gas={:?} realized=${:?}",
                label, result.id, result.tx_hash, result.gas_used, result.realized_profit);
        }
        ExecutionOutcome::Reverted => {
            warn!("❌ [{}] Execution {} reverted: tx={:?} error={:?}",
                label, result.id, result.tx_hash, result.error);
        }
        ExecutionOutcome::TimedOut => {
            warn!("⏳ [{}] Execution {} timed out awaiting receipt: tx={:?} (manual follow-up required)",
                label, result.id, result.tx_hash);
        }
    }
}

pub fn print_disposition(disposition: &ExecuteDisposition) {
    match disposition {
        ExecuteDisposition::Completed(result) => print_execution_result(result),
        ExecuteDisposition::Rejected(rejection) => {
            info!("🚫 Opportunity {} rejected: {}", rejection.opportunity_id, rejection.reason);
        }
    }
}

pub fn print_session_stats(
    start_time: Instant,
    scanned_cycles: u64,
    total_opportunities: u64,
    executed: u64,
    successful: u64,
    rejected: u64,
    error_counts: &HashMap<String, u32>,
) {
    let runtime = start_time.elapsed().as_secs() / 60;

    info!("\n📊 Session Statistics ({} minutes)", runtime);
    info!("   Scan cycles: {}", scanned_cycles);
    info!("   Opportunities emitted: {}", total_opportunities);
    info!("   Executions attempted: {}", executed);
    info!("   Successful: {}", successful);
    info!("   Rejected before chain interaction: {}", rejected);
    if !error_counts.is_empty() {
        info!("   Errors: {:?}", error_counts);
    }
}
