//! Outcome-feedback calibration for the confidence score
//!
//! The pipeline reports definitive execution outcomes here; recent failures
//! for a venue shrink its reliability factor and with it the confidence of
//! future opportunities touching that venue. History itself is never
//! rewritten.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

const SUCCESS_RECOVERY: f64 = 0.05;
const FAILURE_DECAY: f64 = 0.9;
const RELIABILITY_FLOOR: f64 = 0.5;

pub struct ScoreCalibration {
    reliability: Arc<RwLock<HashMap<String, f64>>>,
}

impl ScoreCalibration {
    pub fn new() -> Self {
        Self { reliability: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub async fn reliability_for(&self, venue: &str) -> f64 {
        self.reliability.read().await.get(venue).copied().unwrap_or(1.0)
    }

    pub async fn record_outcome(&self, buy_venue: &str, sell_venue: &str, success: bool) {
        let mut map = self.reliability.write().await;
        for venue in [buy_venue, sell_venue] {
            let entry = map.entry(venue.to_string()).or_insert(1.0);
            *entry = if success {
                (*entry + SUCCESS_RECOVERY).min(1.0)
            } else {
                (*entry * FAILURE_DECAY).max(RELIABILITY_FLOOR)
            };
            debug!("Calibration: {} reliability now {:.3}", venue, entry);
        }
    }
}

impl Default for ScoreCalibration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_venue_is_fully_reliable() {
        let cal = ScoreCalibration::new();
        assert_eq!(cal.reliability_for("aeron-v2").await, 1.0);
    }

    #[tokio::test]
    async fn failures_decay_and_floor() {
        let cal = ScoreCalibration::new();
        for _ in 0..20 {
            cal.record_outcome("a", "b", false).await;
        }
        assert_eq!(cal.reliability_for("a").await, RELIABILITY_FLOOR);
    }

    #[tokio::test]
    async fn successes_recover_up_to_one() {
        let cal = ScoreCalibration::new();
        cal.record_outcome("a", "b", false).await;
        let degraded = cal.reliability_for("a").await;
        assert!(degraded < 1.0);

        for _ in 0..10 {
            cal.record_outcome("a", "b", true).await;
        }
        assert_eq!(cal.reliability_for("a").await, 1.0);
    }

    #[tokio::test]
    async fn both_venues_of_an_outcome_are_calibrated() {
        let cal = ScoreCalibration::new();
        cal.record_outcome("buy-side", "sell-side", false).await;
        assert!(cal.reliability_for("buy-side").await < 1.0);
        assert!(cal.reliability_for("sell-side").await < 1.0);
    }
}
