//! Confidence-of-profitability scoring
//!
//! Deterministic and side-effect-free so it can be property-tested without
//! any network state.

/// Inputs to the confidence score, all pre-computed by the scanner.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceInputs {
    /// Cross-venue spread in percent of the buy price.
    pub spread_pct: f64,
    /// min(buy depth, sell depth) / trade size.
    pub depth_ratio: f64,
    /// Age of the oldest contributing quote, seconds.
    pub age_secs: f64,
    /// Freshness window, seconds.
    pub max_age_secs: f64,
    /// Recent-volume proxy in [0, 1].
    pub volume_score: f64,
}

const W_SPREAD: f64 = 0.35;
const W_LIQUIDITY: f64 = 0.25;
const W_FRESHNESS: f64 = 0.25;
const W_VOLUME: f64 = 0.15;

/// Spread contribution with diminishing returns above ~5%: extreme spreads
/// usually mean stale or thin data, not free money.
fn spread_term(spread_pct: f64) -> f64 {
    if spread_pct <= 0.0 {
        return 0.0;
    }
    1.0 - (-spread_pct / 3.0).exp()
}

/// Liquidity adequacy relative to trade size; saturates once the pools are
/// 20x deeper than the trade.
fn liquidity_term(depth_ratio: f64) -> f64 {
    (depth_ratio / 20.0).clamp(0.0, 1.0)
}

/// Linear decay over the freshness window.
fn freshness_term(age_secs: f64, max_age_secs: f64) -> f64 {
    if max_age_secs <= 0.0 {
        return 0.0;
    }
    (1.0 - age_secs / max_age_secs).clamp(0.0, 1.0)
}

pub fn confidence_score(inputs: &ConfidenceInputs) -> f64 {
    let score = W_SPREAD * spread_term(inputs.spread_pct)
        + W_LIQUIDITY * liquidity_term(inputs.depth_ratio)
        + W_FRESHNESS * freshness_term(inputs.age_secs, inputs.max_age_secs)
        + W_VOLUME * inputs.volume_score.clamp(0.0, 1.0);
    score.clamp(0.0, 1.0)
}
