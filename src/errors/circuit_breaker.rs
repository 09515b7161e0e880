//! Per-(asset, venue-pair) circuit breaker
//!
//! Trips after a configured number of consecutive definitive failures and
//! stays open until an explicit authorized reset. There is no cooldown
//! timer: re-enabling a tripped key is a human/governance decision.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use crate::types::VenuePair;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreakerState {
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BreakerKey {
    pub asset: String,
    pub venues: VenuePair,
}

impl BreakerKey {
    pub fn new(asset: &str, venues: VenuePair) -> Self {
        Self { asset: asset.to_string(), venues }
    }
}

impl std::fmt::Display for BreakerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.asset, self.venues)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakerStatus {
    pub state: BreakerState,
    pub failures: u32,
    pub last_failure: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct BreakerEntry {
    failures: u32,
    tripped: bool,
    last_failure: Option<DateTime<Utc>>,
}

/// Breaker registry. Entries are created lazily on the first observed
/// failure; updated only by the execution pipeline after definitive
/// outcomes.
pub struct CircuitBreakerRegistry {
    entries: Arc<RwLock<HashMap<BreakerKey, BreakerEntry>>>,
    threshold: u32,
}

impl CircuitBreakerRegistry {
    pub fn new(threshold: u32) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            threshold: threshold.max(1),
        }
    }

    /// Record a definitive failed execution. Returns true when this failure
    /// trips the breaker open.
    pub async fn record_failure(&self, key: &BreakerKey) -> bool {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(key.clone()).or_insert(BreakerEntry {
            failures: 0,
            tripped: false,
            last_failure: None,
        });
        entry.failures += 1;
        entry.last_failure = Some(Utc::now());

        if !entry.tripped && entry.failures >= self.threshold {
            entry.tripped = true;
            error!(
                "⚡ Circuit breaker OPEN for {} after {} consecutive failures",
                key, entry.failures
            );
            return true;
        }
        if !entry.tripped {
            warn!("Failure {}/{} recorded for {}", entry.failures, self.threshold, key);
        }
        false
    }

    /// Record a successful execution; resets the failure count to zero.
    /// Does not reopen a tripped breaker.
    pub async fn record_success(&self, key: &BreakerKey) {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(key) {
            if !entry.tripped {
                entry.failures = 0;
            }
        }
    }

    pub async fn is_open(&self, key: &BreakerKey) -> bool {
        self.entries
            .read()
            .await
            .get(key)
            .map(|e| e.tripped)
            .unwrap_or(false)
    }

    pub async fn status(&self, key: &BreakerKey) -> BreakerStatus {
        match self.entries.read().await.get(key) {
            Some(e) => BreakerStatus {
                state: if e.tripped { BreakerState::Open } else { BreakerState::Closed },
                failures: e.failures,
                last_failure: e.last_failure,
            },
            None => BreakerStatus {
                state: BreakerState::Closed,
                failures: 0,
                last_failure: None,
            },
        }
    }

    /// Clear a tripped breaker. The caller is responsible for verifying the
    /// reset authorization first; this only mutates local state.
    pub async fn reset(&self, key: &BreakerKey) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            Some(entry) => {
                entry.failures = 0;
                entry.tripped = false;
                info!("Circuit breaker reset for {}", key);
                true
            }
            None => false,
        }
    }
}
