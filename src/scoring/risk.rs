//! Risk-of-adverse-outcome scoring

/// Inputs to the risk score.
#[derive(Debug, Clone, Copy)]
pub struct RiskInputs {
    pub trade_size: f64,
    pub buy_depth: f64,
    pub sell_depth: f64,
    /// Cross-venue spread in percent.
    pub spread_pct: f64,
    /// Age of the oldest contributing quote, seconds.
    pub age_secs: f64,
    pub max_age_secs: f64,
    /// Gas cost as a fraction of gross profit.
    pub gas_fraction: f64,
    /// Asset risk tier weight in [0, 1].
    pub tier_weight: f64,
    /// Short-window price volatility, percent.
    pub volatility_pct: f64,
}

const W_IMPACT: f64 = 0.25;
const W_SIZE: f64 = 0.10;
const W_SPREAD: f64 = 0.20;
const W_GAS: f64 = 0.15;
const W_TIER: f64 = 0.20;
const W_VOLATILITY: f64 = 0.10;

/// Trade size beyond which the absolute-size term saturates.
const SIZE_SATURATION: f64 = 100_000.0;

/// Square-root-of-size price impact against pool depth, averaged over both
/// legs.
fn impact_term(trade_size: f64, buy_depth: f64, sell_depth: f64) -> f64 {
    let leg = |depth: f64| {
        if depth <= 0.0 {
            return 1.0;
        }
        (trade_size / depth).max(0.0).sqrt().min(1.0)
    };
    (leg(buy_depth) + leg(sell_depth)) / 2.0
}

/// A large spread is only a risk signal when the data backing it is old:
/// large and fresh is opportunity, large and stale is danger.
fn suspicious_spread_term(spread_pct: f64, age_secs: f64, max_age_secs: f64) -> f64 {
    let excess = ((spread_pct - 5.0) / 10.0).clamp(0.0, 1.0);
    let staleness = if max_age_secs > 0.0 {
        (age_secs / max_age_secs).clamp(0.0, 1.0)
    } else {
        1.0
    };
    excess * (0.4 + 0.6 * staleness)
}

pub fn risk_score(inputs: &RiskInputs) -> f64 {
    let score = W_IMPACT * impact_term(inputs.trade_size, inputs.buy_depth, inputs.sell_depth)
        + W_SIZE * (inputs.trade_size / SIZE_SATURATION).clamp(0.0, 1.0)
        + W_SPREAD * suspicious_spread_term(inputs.spread_pct, inputs.age_secs, inputs.max_age_secs)
        + W_GAS * inputs.gas_fraction.clamp(0.0, 1.0)
        + W_TIER * inputs.tier_weight.clamp(0.0, 1.0)
        + W_VOLATILITY * (inputs.volatility_pct / 10.0).clamp(0.0, 1.0);
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn base_inputs() -> RiskInputs {
        RiskInputs {
            trade_size: 1000.0,
            buy_depth: 500_000.0,
            sell_depth: 500_000.0,
            spread_pct: 1.0,
            age_secs: 2.0,
            max_age_secs: 15.0,
            gas_fraction: 0.1,
            tier_weight: 0.05,
            volatility_pct: 1.0,
        }
    }

    #[test]
    fn bigger_trade_into_same_pool_is_riskier() {
        let small = risk_score(&base_inputs());
        let big = risk_score(&RiskInputs { trade_size: 50_000.0, ..base_inputs() });
        assert!(big > small);
    }

    #[test]
    fn large_stale_spread_is_riskier_than_large_fresh_spread() {
        let fresh = risk_score(&RiskInputs { spread_pct: 12.0, age_secs: 0.0, ..base_inputs() });
        let stale = risk_score(&RiskInputs { spread_pct: 12.0, age_secs: 15.0, ..base_inputs() });
        assert!(stale > fresh);
    }

    #[test]
    fn zero_depth_maxes_the_impact_leg() {
        assert_eq!(impact_term(100.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn gas_heavy_trades_are_riskier() {
        let cheap = risk_score(&base_inputs());
        let heavy = risk_score(&RiskInputs { gas_fraction: 0.9, ..base_inputs() });
        assert!(heavy > cheap);
    }

    proptest! {
        #[test]
        fn risk_is_always_in_unit_interval(
            size in 0.0f64..1_000_000.0,
            buy_depth in 0.0f64..10_000_000.0,
            sell_depth in 0.0f64..10_000_000.0,
            spread in -5.0f64..200.0,
            age in 0.0f64..300.0,
            gas in -1.0f64..10.0,
            tier in 0.0f64..1.0,
            vol in 0.0f64..100.0,
        ) {
            let score = risk_score(&RiskInputs {
                trade_size: size,
                buy_depth,
                sell_depth,
                spread_pct: spread,
                age_secs: age,
                max_age_secs: 15.0,
                gas_fraction: gas,
                tier_weight: tier,
                volatility_pct: vol,
            });
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}
