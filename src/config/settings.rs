//! Engine configuration settings and environment variable handling

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;

// Trade sizing constants
pub const MIN_TRADE_SIZE: Decimal = dec!(10);
pub const MAX_TRADE_SIZE: Decimal = dec!(250000);
pub const DEFAULT_CAP_FRACTION: Decimal = dec!(0.05); // 5% of pool depth
pub const MIN_CAP_FRACTION: Decimal = dec!(0.01);
pub const MAX_CAP_FRACTION: Decimal = dec!(0.10);

// Profit target band (reference currency)
pub const DEFAULT_MIN_PROFIT_USD: Decimal = dec!(4);
pub const DEFAULT_MAX_PROFIT_USD: Decimal = dec!(30);

// Quote handling constants
pub const QUOTE_FRESHNESS_SECS: i64 = 15;
pub const VENUE_QUERY_TIMEOUT_SECS: u64 = 5;
pub const MAX_RANKED_OPPORTUNITIES: usize = 15;

// Flash loan provider premium, basis points of borrowed principal
pub const LOAN_FEE_BPS: u32 = 9; // 0.09%

// Gas model constants
pub const BASE_GAS_UNITS: u64 = 180_000;
pub const PER_HOP_GAS_UNITS: u64 = 120_000;
pub const FLASHLOAN_OVERHEAD_GAS_UNITS: u64 = 90_000;
pub const GAS_SNAPSHOT_MAX_AGE_SECS: u64 = 30;

// Execution constants
pub const GAS_BUFFER_NUM: u64 = 12; // estimate x1.2
pub const GAS_BUFFER_DEN: u64 = 10;
pub const DEFAULT_FALLBACK_GAS_LIMIT: u64 = 900_000;
pub const RECEIPT_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_BREAKER_THRESHOLD: u32 = 3;

// Native-asset price sanity bounds (USD)
pub const NATIVE_PRICE_MIN: Decimal = dec!(100);
pub const NATIVE_PRICE_MAX: Decimal = dec!(100000);

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub private_key: Option<String>,
    pub owner_key: Option<String>,
    pub dry_run: bool,
    // Scanning configuration
    pub trial_amount: Decimal,
    pub max_trade_size: Decimal,
    pub cap_fraction: Decimal,
    pub min_profit_usd: Decimal,
    pub max_profit_usd: Decimal,
    pub max_ranked_opportunities: usize,
    pub scan_interval_secs: u64,
    // Quote configuration
    pub venue_timeout_secs: u64,
    pub quote_freshness_secs: i64,
    pub reference_depth: Decimal,
    // Execution configuration
    pub breaker_threshold: u32,
    pub fallback_gas_limit: u64,
    pub receipt_timeout_secs: u64,
    pub max_gas_price_gwei: u64,
    pub slippage_tolerance_bps: u32,
    pub native_price_symbol: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            rpc_url: env::var("RPC_URL")
                .unwrap_or_else(|_| "http://localhost:8545".to_string()),
            private_key: env::var("PRIVATE_KEY").ok(),
            owner_key: env::var("OWNER_PRIVATE_KEY").ok(),
            dry_run: env::var("DRY_RUN")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            trial_amount: env::var("TRIAL_AMOUNT")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(1000)),
            max_trade_size: env::var("MAX_TRADE_SIZE")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(50000))
                .max(MIN_TRADE_SIZE)
                .min(MAX_TRADE_SIZE),
            cap_fraction: env::var("CAP_FRACTION")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(DEFAULT_CAP_FRACTION)
                .max(MIN_CAP_FRACTION)
                .min(MAX_CAP_FRACTION),
            min_profit_usd: env::var("MIN_PROFIT_USD")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(DEFAULT_MIN_PROFIT_USD),
            max_profit_usd: env::var("MAX_PROFIT_USD")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(DEFAULT_MAX_PROFIT_USD),
            max_ranked_opportunities: env::var("MAX_RANKED_OPPORTUNITIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_RANKED_OPPORTUNITIES)
                .clamp(1, 50),
            scan_interval_secs: env::var("SCAN_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            venue_timeout_secs: env::var("VENUE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(VENUE_QUERY_TIMEOUT_SECS),
            quote_freshness_secs: env::var("QUOTE_FRESHNESS_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(QUOTE_FRESHNESS_SECS)
                .clamp(5, 60),
            reference_depth: env::var("REFERENCE_DEPTH")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(500000)),
            breaker_threshold: env::var("BREAKER_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_BREAKER_THRESHOLD)
                .max(1),
            fallback_gas_limit: env::var("FALLBACK_GAS_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FALLBACK_GAS_LIMIT),
            receipt_timeout_secs: env::var("RECEIPT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(RECEIPT_TIMEOUT_SECS),
            max_gas_price_gwei: env::var("MAX_GAS_PRICE_GWEI")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(200),
            slippage_tolerance_bps: env::var("SLIPPAGE_TOLERANCE_BPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50),
            native_price_symbol: env::var("NATIVE_PRICE_SYMBOL")
                .unwrap_or_else(|_| "ETHUSDC".to_string()),
        }
    }
}
