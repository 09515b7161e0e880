//! Execution types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Terminal classification of an execution attempt. `TimedOut` is ambiguous:
/// the transaction may still confirm later, so it is never auto-resubmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExecutionOutcome {
    Success,
    Reverted,
    TimedOut,
}

/// Record of one execution attempt, owned by the pipeline after the executor
/// produces it.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub id: String,
    pub opportunity_id: String,
    pub outcome: ExecutionOutcome,
    pub tx_hash: Option<String>,
    pub gas_used: Option<u64>,
    pub expected_profit: Decimal,
    pub realized_profit: Option<Decimal>,
    pub error: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
}

/// Structured reason an opportunity was not executed. Normal control flow,
/// not an error.
#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    pub opportunity_id: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl Rejection {
    pub fn new(opportunity_id: &str, reason: impl Into<String>) -> Self {
        Self {
            opportunity_id: opportunity_id.to_string(),
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of `pipeline::execute`: either the executor ran the trade, or a
/// vet stage rejected it with a human-readable reason.
#[derive(Debug, Clone, Serialize)]
pub enum ExecuteDisposition {
    Completed(ExecutionResult),
    Rejected(Rejection),
}
