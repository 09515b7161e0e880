//! Gas-price and native-asset-price snapshot
//!
//! Refreshed on its own schedule, not per fee computation. When no live
//! snapshot exists the fee model refuses to estimate; understating gas cost
//! would inflate apparent profit.

use anyhow::Context;
use rust_decimal::Decimal;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use crate::{
    config::GAS_SNAPSHOT_MAX_AGE_SECS,
    errors::{EngineError, EngineResult},
    network::{fetch_native_usd_price, retry_with_backoff, RetryConfig},
    ConcreteProvider,
};
use alloy::providers::Provider;

#[derive(Debug, Clone)]
pub struct GasSnapshot {
    pub gas_price_wei: u128,
    pub native_usd: Decimal,
    pub fetched_at: Instant,
}

pub struct GasOracle {
    snapshot: RwLock<Option<GasSnapshot>>,
    max_age: Duration,
}

impl GasOracle {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(None),
            max_age: Duration::from_secs(GAS_SNAPSHOT_MAX_AGE_SECS),
        }
    }

    /// Pull a fresh gas price and native USD price. Called by the refresh
    /// loop; failures leave the previous snapshot in place until it ages out.
    pub async fn refresh(&self, provider: &ConcreteProvider, symbol: &str) -> EngineResult<()> {
        let gas_price_wei = retry_with_backoff(
            || async {
                provider.get_gas_price().await
                    .context("Failed to fetch gas price")
            },
            &RetryConfig::default(),
            "gas price fetch",
        ).await?;

        let native_usd = fetch_native_usd_price(symbol).await?;

        debug!("⛽ Gas snapshot: {} wei, native ${}", gas_price_wei, native_usd);
        self.install(GasSnapshot {
            gas_price_wei,
            native_usd,
            fetched_at: Instant::now(),
        }).await;
        Ok(())
    }

    pub async fn install(&self, snapshot: GasSnapshot) {
        *self.snapshot.write().await = Some(snapshot);
    }

    /// Current snapshot, or `GasPriceUnavailable` when missing or stale.
    pub async fn current(&self) -> EngineResult<GasSnapshot> {
        match self.snapshot.read().await.as_ref() {
            Some(s) if s.fetched_at.elapsed() <= self.max_age => Ok(s.clone()),
            _ => Err(EngineError::GasPriceUnavailable),
        }
    }
}

impl Default for GasOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn empty_oracle_refuses_to_answer() {
        let oracle = GasOracle::new();
        assert!(matches!(oracle.current().await, Err(EngineError::GasPriceUnavailable)));
    }

    #[tokio::test]
    async fn stale_snapshot_is_rejected() {
        let oracle = GasOracle::new();
        oracle.install(GasSnapshot {
            gas_price_wei: 50_000_000_000,
            native_usd: dec!(3000),
            fetched_at: Instant::now() - Duration::from_secs(GAS_SNAPSHOT_MAX_AGE_SECS + 5),
        }).await;
        assert!(matches!(oracle.current().await, Err(EngineError::GasPriceUnavailable)));
    }

    #[tokio::test]
    async fn fresh_snapshot_is_served() {
        let oracle = GasOracle::new();
        oracle.install(GasSnapshot {
            gas_price_wei: 50_000_000_000,
            native_usd: dec!(3000),
            fetched_at: Instant::now(),
        }).await;
        let snapshot = oracle.current().await.unwrap();
        assert_eq!(snapshot.gas_price_wei, 50_000_000_000);
    }
}
