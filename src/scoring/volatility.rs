//! Short-window price volatility tracking

use std::collections::VecDeque;
use std::time::{Duration, SystemTime};
use tracing::warn;

const MIN_SAMPLES: usize = 10;

pub struct VolatilityTracker {
    window: VecDeque<(SystemTime, f64)>,
    max_duration: Duration,
}

impl VolatilityTracker {
    pub fn new(max_duration_secs: u64) -> Self {
        VolatilityTracker {
            window: VecDeque::new(),
            max_duration: Duration::from_secs(max_duration_secs),
        }
    }

    pub fn add_sample(&mut self, price: f64) {
        let now = SystemTime::now();
        self.window.push_back((now, price));

        while let Some((timestamp, _)) = self.window.front() {
            if let Ok(duration) = now.duration_since(*timestamp) {
                if duration > self.max_duration {
                    self.window.pop_front();
                } else {
                    break;
                }
            } else {
                warn!("Encountered a timestamp in the future: {:?}", timestamp);
                self.window.pop_front();
            }
        }
    }

    /// Standard deviation of the window as a percentage of its mean. Returns
    /// zero until enough samples have accumulated.
    pub fn volatility_pct(&self) -> f64 {
        if self.window.len() < MIN_SAMPLES {
            return 0.0;
        }

        let prices: Vec<f64> = self.window.iter().map(|(_, price)| *price).collect();
        let mean: f64 = prices.iter().sum::<f64>() / prices.len() as f64;
        if mean <= 0.0 {
            return 0.0;
        }
        let variance: f64 =
            prices.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / prices.len() as f64;

        (variance.sqrt() / mean) * 100.0
    }

    pub fn sample_count(&self) -> usize {
        self.window.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_samples_reports_zero() {
        let mut tracker = VolatilityTracker::new(300);
        for _ in 0..5 {
            tracker.add_sample(100.0);
        }
        assert_eq!(tracker.volatility_pct(), 0.0);
    }

    #[test]
    fn flat_prices_have_zero_volatility() {
        let mut tracker = VolatilityTracker::new(300);
        for _ in 0..20 {
            tracker.add_sample(100.0);
        }
        assert_eq!(tracker.volatility_pct(), 0.0);
    }

    #[test]
    fn swinging_prices_have_positive_volatility() {
        let mut tracker = VolatilityTracker::new(300);
        for i in 0..20 {
            tracker.add_sample(if i % 2 == 0 { 95.0 } else { 105.0 });
        }
        assert!(tracker.volatility_pct() > 4.0);
    }
}
