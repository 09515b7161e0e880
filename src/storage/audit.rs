//! Append-only JSONL audit trail
//!
//! One line per record, one file per day. Opportunities, execution results,
//! and rejections all land here; nothing in these records ever includes key
//! material.

use anyhow::Result;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::info;

use crate::types::{ArbitrageOpportunity, ExecutionResult, Rejection};

fn append_jsonl<T: serde::Serialize>(path: &str, record: &T) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", serde_json::to_string(record)?)?;
    Ok(())
}

pub fn save_opportunity(opp: &ArbitrageOpportunity) -> Result<()> {
    let filename =
        format!("output/opportunities/arbitrage_{}.jsonl", Utc::now().format("%Y-%m-%d"));
    append_jsonl(&filename, opp)?;

    info!(
        opportunity_id = %opp.id,
        pair = %opp.pair,
        net_profit = %opp.net_profit,
        "Saved ranked arbitrage opportunity"
    );
    Ok(())
}

pub fn save_execution(result: &ExecutionResult) -> Result<()> {
    let filename =
        format!("output/executions/execution_{}.jsonl", Utc::now().format("%Y-%m-%d"));
    append_jsonl(&filename, result)?;

    info!(
        execution_id = %result.id,
        opportunity_id = %result.opportunity_id,
        outcome = ?result.outcome,
        dry_run = result.dry_run,
        "Saved execution record"
    );
    Ok(())
}

pub fn save_rejection(rejection: &Rejection) -> Result<()> {
    let filename =
        format!("output/executions/rejections_{}.jsonl", Utc::now().format("%Y-%m-%d"));
    append_jsonl(&filename, rejection)?;
    Ok(())
}
