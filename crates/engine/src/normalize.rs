//! Fixed-point amount decoding and encoding.
//!
//! Upstream amounts are integers scaled by a token's decimals and routinely
//! exceed what fits in a `Decimal` mantissa (raw values reach `1e30`). Integer
//! strings are therefore split into whole and fractional parts with [`U256`]
//! arithmetic before being turned into a [`Decimal`].
//!
//! Decoding fails soft: anything that cannot be read as a number decodes to
//! zero. [`try_from_fixed_point`] exposes the failure for callers that want
//! to log it.

use std::str::FromStr;

use alloy_primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};

/// Largest scale a [`Decimal`] can carry.
pub const MAX_SCALE: u32 = 28;

/// Round half away from zero to `dp` decimal places.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a plain decimal string ("100.5", "-3", "1e-6").
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Decode `raw / 10^scale`, or `None` if `raw` is not numeric.
///
/// Integer strings of any length up to 78 digits are supported. Strings with a
/// decimal point or an exponent are parsed as decimals first. Signs pass
/// through unchanged.
pub fn try_from_fixed_point(raw: &str, scale: u32) -> Option<Decimal> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude = if digits.bytes().all(|b| b.is_ascii_digit()) {
        decode_integer(digits, scale)?
    } else {
        shift_down(parse_decimal(digits)?, scale)?
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// Decode `raw / 10^scale` rounded to `display_decimals`; zero if `raw` is not
/// numeric.
pub fn from_fixed_point(raw: impl AsRef<str>, scale: u32, display_decimals: u32) -> Decimal {
    try_from_fixed_point(raw.as_ref(), scale)
        .map_or(Decimal::ZERO, |value| round_to(value, display_decimals))
}

/// Encode `value * 10^scale` as an integer string.
///
/// When `round_decimals` is set the value is rounded to that many places
/// first. Digits below the target scale are truncated. Returns `"0"` if the
/// result does not fit in 256 bits.
pub fn to_fixed_point(value: Decimal, scale: u32, round_decimals: Option<u32>) -> String {
    let value = match round_decimals {
        Some(dp) => round_to(value, dp),
        None => value,
    };

    match encode_magnitude(value, scale) {
        Some(raw) if raw.is_zero() => "0".to_string(),
        Some(raw) if value.is_sign_negative() => format!("-{raw}"),
        Some(raw) => raw.to_string(),
        None => "0".to_string(),
    }
}

fn pow10_u256(exp: u32) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(exp))
}

fn pow10_decimal(exp: u32) -> Option<Decimal> {
    Decimal::try_from_i128_with_scale(10_i128.checked_pow(exp)?, 0).ok()
}

fn decode_integer(digits: &str, scale: u32) -> Option<Decimal> {
    let raw = U256::from_str_radix(digits, 10).ok()?;
    let (whole, frac) = raw.div_rem(pow10_u256(scale)?);

    let whole = Decimal::from_str(&whole.to_string()).ok()?;
    if frac.is_zero() {
        return Some(whole);
    }

    // Left-pad to the full scale, then keep what a Decimal can hold.
    let mut frac_digits = format!("{:0>width$}", frac.to_string(), width = scale as usize);
    frac_digits.truncate(MAX_SCALE as usize);
    let frac = Decimal::from_str(&format!("0.{frac_digits}")).ok()?;

    whole.checked_add(frac)
}

fn shift_down(mut value: Decimal, mut scale: u32) -> Option<Decimal> {
    while scale > 0 {
        let step = scale.min(MAX_SCALE);
        value = value.checked_div(pow10_decimal(step)?)?;
        scale -= step;
    }
    Some(value)
}

fn encode_magnitude(value: Decimal, scale: u32) -> Option<U256> {
    let mantissa = U256::from(value.mantissa().unsigned_abs());
    let current = value.scale();

    if scale >= current {
        mantissa.checked_mul(pow10_u256(scale - current)?)
    } else {
        Some(mantissa / pow10_u256(current - scale)?)
    }
}
