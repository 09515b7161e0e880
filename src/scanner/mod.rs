//! Opportunity scanner
//!
//! Pairs every venue quote against every other, sizes a candidate trade
//! against available depth, prices it through the fee model, scores it, and
//! returns the top-N candidates inside the profit target band. Pure given
//! its inputs: running it twice over the same quotes yields the same ranked
//! list.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;
use crate::{
    fees::{compose_fees, gross_profit, mid_price},
    network::GasSnapshot,
    scoring::{confidence_score, risk_score, ConfidenceInputs, RiskInputs},
    types::{ArbitrageOpportunity, AssetPair, PriceQuote, VenueDescriptor},
};

#[derive(Debug, Clone)]
pub struct ScanParams {
    pub cap_fraction: Decimal,
    pub max_trade_size: Decimal,
    pub min_trade_size: Decimal,
    pub min_profit: Decimal,
    pub max_profit: Decimal,
    pub freshness_secs: i64,
    pub top_n: usize,
    /// Per-venue reliability factors from outcome calibration; missing
    /// venues count as fully reliable.
    pub venue_reliability: HashMap<String, f64>,
    pub volatility_pct: f64,
    /// Risk-tier weight of the non-borrowed asset.
    pub tier_weight: f64,
    /// Injected clock so scans are reproducible.
    pub now: DateTime<Utc>,
}

fn reliability(params: &ScanParams, venue: &str) -> f64 {
    params.venue_reliability.get(venue).copied().unwrap_or(1.0)
}

fn venue_quality(venues: &[VenueDescriptor], name: &str) -> f64 {
    venues
        .iter()
        .find(|v| v.name == name)
        .map(|v| v.liquidity_quality)
        .unwrap_or(0.5)
}

/// Rank arbitrage candidates for one pair from a set of fresh quotes.
pub fn rank_opportunities(
    pair: &AssetPair,
    quotes: &[PriceQuote],
    venues: &[VenueDescriptor],
    snapshot: &GasSnapshot,
    params: &ScanParams,
) -> Vec<ArbitrageOpportunity> {
    let fresh: Vec<&PriceQuote> = quotes
        .iter()
        .filter(|q| q.is_fresh(params.now, params.freshness_secs))
        .collect();

    let mut candidates = Vec::new();

    for i in 0..fresh.len() {
        for j in (i + 1)..fresh.len() {
            let (a, b) = (fresh[i], fresh[j]);
            let (mid_a, mid_b) = (mid_price(a), mid_price(b));
            // Buy where the quote asset is cheap, sell where it is dear.
            let (buy, sell, buy_mid, sell_mid) = if mid_a <= mid_b {
                (a, b, mid_a, mid_b)
            } else {
                (b, a, mid_b, mid_a)
            };
            if buy_mid <= dec!(0) || sell_mid <= buy_mid {
                continue;
            }

            let size = (buy.depth.min(sell.depth) * params.cap_fraction)
                .min(params.max_trade_size);
            if size < params.min_trade_size {
                debug!(
                    "Skipping {}<->{}: candidate size {} below floor",
                    buy.venue, sell.venue, size
                );
                continue;
            }

            let gross = gross_profit(size, buy_mid, sell_mid);
            let fees = compose_fees(size, buy_mid, sell_mid, buy.fee_bps, sell.fee_bps, snapshot);
            let net = gross - fees.total;

            if net < params.min_profit {
                debug!(
                    "Rejecting {}<->{}: net ${:.2} below target band",
                    buy.venue, sell.venue, net
                );
                continue;
            }
            if net > params.max_profit {
                debug!(
                    "Rejecting {}<->{}: net ${:.2} above maximum target",
                    buy.venue, sell.venue, net
                );
                continue;
            }

            let spread_pct = ((sell_mid - buy_mid) / buy_mid * dec!(100))
                .to_f64()
                .unwrap_or(0.0);
            let age_secs = buy
                .age_secs(params.now)
                .max(sell.age_secs(params.now))
                .max(0) as f64;
            let size_f = size.to_f64().unwrap_or(0.0);
            let depth_buy = buy.depth.to_f64().unwrap_or(0.0);
            let depth_sell = sell.depth.to_f64().unwrap_or(0.0);
            let gas_fraction = if gross > dec!(0) {
                (fees.gas_cost / gross).to_f64().unwrap_or(1.0)
            } else {
                1.0
            };
            let volume_score =
                (venue_quality(venues, &buy.venue) + venue_quality(venues, &sell.venue)) / 2.0;

            let pair_reliability =
                reliability(params, &buy.venue).min(reliability(params, &sell.venue));
            let confidence = confidence_score(&ConfidenceInputs {
                spread_pct,
                depth_ratio: if size_f > 0.0 { depth_buy.min(depth_sell) / size_f } else { 0.0 },
                age_secs,
                max_age_secs: params.freshness_secs as f64,
                volume_score,
            }) * pair_reliability;

            let risk = risk_score(&RiskInputs {
                trade_size: size_f,
                buy_depth: depth_buy,
                sell_depth: depth_sell,
                spread_pct,
                age_secs,
                max_age_secs: params.freshness_secs as f64,
                gas_fraction,
                tier_weight: params.tier_weight,
                volatility_pct: params.volatility_pct,
            });

            let mut risk_flags = Vec::new();
            if spread_pct > 5.0 && age_secs > params.freshness_secs as f64 / 2.0 {
                risk_flags.push("large spread backed by aging quotes".to_string());
            }
            // Flag only when the depth cap binds: the trade is taking its
            // full allowed share of a thin pool rather than being limited
            // by the configured maximum size.
            if size >= buy.depth.min(sell.depth) * params.cap_fraction {
                risk_flags.push("trade size capped by the thinner pool's depth".to_string());
            }
            if gas_fraction > 0.5 {
                risk_flags.push("gas consumes over half of gross profit".to_string());
            }
            if params.volatility_pct > 5.0 {
                risk_flags.push("elevated short-window volatility".to_string());
            }

            let priority = priority_for(confidence, net, depth_buy + depth_sell, size_f, params);

            candidates.push(ArbitrageOpportunity {
                id: Uuid::new_v4().to_string(),
                timestamp: params.now,
                pair: pair.to_string(),
                buy_venue: buy.venue.clone(),
                sell_venue: sell.venue.clone(),
                buy_price: buy_mid,
                sell_price: sell_mid,
                buy_fee_bps: buy.fee_bps,
                sell_fee_bps: sell.fee_bps,
                loan_amount: size,
                gross_profit: gross,
                fees,
                net_profit: net,
                confidence,
                risk,
                priority,
                risk_flags,
            });
        }
    }

    candidates.sort_by(|x, y| {
        y.priority
            .partial_cmp(&x.priority)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(y.net_profit.cmp(&x.net_profit))
    });
    candidates.truncate(params.top_n);
    candidates
}

/// Execution priority: confidence scaled up for profit near the band's
/// midpoint and for high combined venue depth.
fn priority_for(
    confidence: f64,
    net: Decimal,
    combined_depth: f64,
    size: f64,
    params: &ScanParams,
) -> f64 {
    let mid = (params.min_profit + params.max_profit) / dec!(2);
    let half = (params.max_profit - params.min_profit) / dec!(2);
    let midpoint_closeness = if half > dec!(0) {
        (dec!(1) - ((net - mid).abs() / half)).to_f64().unwrap_or(0.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let liquidity_bonus = if size > 0.0 {
        (combined_depth / (size * 40.0)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    confidence * (1.0 + 0.25 * midpoint_closeness) * (1.0 + 0.15 * liquidity_bonus)
}
