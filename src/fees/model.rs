//! Pure fee and gas computation
//!
//! No I/O: the only external input is the cached gas snapshot, which the
//! caller obtains from the oracle. When no snapshot exists the oracle
//! refuses and so does every fee composition built on it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::{
    config::{BASE_GAS_UNITS, FLASHLOAN_OVERHEAD_GAS_UNITS, LOAN_FEE_BPS, PER_HOP_GAS_UNITS},
    network::GasSnapshot,
    types::{FeeBreakdown, PriceQuote},
    utils::pow10,
};

/// Venue fee on a notional amount, basis points of notional.
pub fn venue_fee(fee_bps: u32, notional: Decimal) -> Decimal {
    notional * Decimal::from(fee_bps) / dec!(10000)
}

/// Flash-loan provider premium on the borrowed principal.
pub fn loan_fee(principal: Decimal) -> Decimal {
    principal * Decimal::from(LOAN_FEE_BPS) / dec!(10000)
}

/// Gas cost in reference currency for a route with `hops` venue swaps plus
/// the flash-loan overhead.
pub fn gas_cost_usd(hops: u32, snapshot: &GasSnapshot) -> Decimal {
    let units = BASE_GAS_UNITS + u64::from(hops) * PER_HOP_GAS_UNITS + FLASHLOAN_OVERHEAD_GAS_UNITS;
    let wei = Decimal::from(units) * Decimal::from(snapshot.gas_price_wei);
    (wei / pow10(18)) * snapshot.native_usd
}

/// Fee-exclusive mid price implied by a quote: output venues charge their
/// fee on the input side, so the mid is `in * (1 - fee) / out`, in base
/// units per quote-asset unit.
pub fn mid_price(quote: &PriceQuote) -> Decimal {
    let effective_in = quote.amount_in * (dec!(1) - Decimal::from(quote.fee_bps) / dec!(10000));
    effective_in / quote.amount_out
}

/// Full cost side for a two-leg trade of `size` base units bought at
/// `buy_mid` and sold at `sell_mid`.
pub fn compose_fees(
    size: Decimal,
    buy_mid: Decimal,
    sell_mid: Decimal,
    buy_fee_bps: u32,
    sell_fee_bps: u32,
    snapshot: &GasSnapshot,
) -> FeeBreakdown {
    let sell_notional = size * sell_mid / buy_mid;
    let venue_fees = venue_fee(buy_fee_bps, size) + venue_fee(sell_fee_bps, sell_notional);
    FeeBreakdown::new(venue_fees, loan_fee(size), gas_cost_usd(2, snapshot))
}

/// Gross profit of buying `size` base units at `buy_mid` and selling at
/// `sell_mid`.
pub fn gross_profit(size: Decimal, buy_mid: Decimal, sell_mid: Decimal) -> Decimal {
    size * (sell_mid / buy_mid - dec!(1))
}
