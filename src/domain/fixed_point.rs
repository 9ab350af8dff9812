//! Fixed-point arithmetic over `u128` amounts.
//!
//! Amounts are stored as `u128` scaled by [`SCALE`]. Every product is formed in
//! arbitrary precision before dividing, so intermediates such as
//! `value * SCALE` never wrap; only a final result that does not fit in `u128`
//! is reported, as [`LedgerError::Overflow`].

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use super::error::LedgerError;

/// Fixed-point denominator for all valuation amounts (18 decimals).
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Native precision of the reference price feeds (8 decimals).
pub const PRICE_DECIMALS: u32 = 8;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// `a * b / denom`, rounded down.
pub fn mul_div(a: u128, b: u128, denom: u128) -> Result<u128, LedgerError> {
    if denom == 0 {
        return Err(LedgerError::DivideByZero);
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / denom);
    }
    let wide = BigUint::from(a) * BigUint::from(b) / BigUint::from(denom);
    wide.to_u128().ok_or(LedgerError::Overflow)
}

/// `a * SCALE / b`.
pub fn divide(a: u128, b: u128) -> Result<u128, LedgerError> {
    mul_div(a, SCALE, b)
}

/// `10^exp` as a `u128`.
pub fn pow10(exp: u32) -> Result<u128, LedgerError> {
    10u128.checked_pow(exp).ok_or(LedgerError::Overflow)
}

/// `amount * bps / 10_000`, rounded down.
pub fn apply_bps(amount: u128, bps: u128) -> Result<u128, LedgerError> {
    mul_div(amount, bps, BPS_DENOMINATOR)
}

/// Render a `SCALE`d amount as a decimal string, e.g. `215.544`.
pub fn format_scaled(amount: u128) -> String {
    let whole = amount / SCALE;
    let frac = amount % SCALE;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:018}", frac);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
