//! Mathematical utility functions

use alloy::primitives::U256;
use anyhow::{Context, Result};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

pub fn pow10(n: i32) -> Decimal {
    match n {
        0 => dec!(1),
        6 => dec!(1_000_000),
        18 => dec!(1_000_000_000_000_000_000),
        _ => {
            let mut result = dec!(1);
            if n > 0 {
                for _ in 0..n {
                    result *= dec!(10);
                }
            } else {
                for _ in 0..(-n) {
                    result /= dec!(10);
                }
            }
            result
        }
    }
}

/// Convert a raw on-chain amount into asset units.
pub fn from_raw(raw: U256, decimals: u32) -> Result<Decimal> {
    let value = Decimal::from_str(&raw.to_string())
        .context("raw amount exceeds decimal range")?;
    Ok(value / pow10(decimals as i32))
}

/// Convert an asset-unit amount into a raw on-chain amount, truncating any
/// dust below the asset's precision.
pub fn to_raw(amount: Decimal, decimals: u32) -> Result<U256> {
    let scaled = (amount * pow10(decimals as i32)).trunc();
    if scaled.is_sign_negative() {
        anyhow::bail!("cannot convert negative amount {amount} to raw units");
    }
    U256::from_str(&scaled.to_string()).context("scaled amount exceeds uint256")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_conversion_round_trips_whole_units() {
        let raw = to_raw(dec!(1234.5), 6).unwrap();
        assert_eq!(raw, U256::from(1_234_500_000u64));
        assert_eq!(from_raw(raw, 6).unwrap(), dec!(1234.5));
    }

    #[test]
    fn to_raw_truncates_sub_precision_dust() {
        let raw = to_raw(dec!(0.0000001), 6).unwrap();
        assert_eq!(raw, U256::ZERO);
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(to_raw(dec!(-1), 6).is_err());
    }
}
