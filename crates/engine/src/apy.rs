//! Trailing-window APY from the vault share-price series.

use rust_decimal::Decimal;

use crate::merge::VaultPoint;
use crate::normalize::round_to;

pub const SECONDS_PER_DAY: i64 = 86_400;
pub const DAYS_PER_YEAR: i64 = 365;

/// Simple annualised share-price growth over the last `window_days`.
///
/// `history` must be newest first and may contain duplicate timestamps. The
/// window is only computed when the history holds at least `window_days`
/// records, a record-count proxy for "enough history" that undercounts on
/// vaults reporting less than daily.
///
/// The initial price is taken from the oldest record at or after
/// `newest.timestamp - window_days * 86400`, where `newest` is the first
/// record whatever its price. Records with a zero share price are otherwise
/// ignored. The result is a percentage rounded to 2 places.
pub fn trailing_apy(history: &[VaultPoint], window_days: u32) -> Option<Decimal> {
    if window_days == 0 || history.len() < window_days as usize {
        return None;
    }

    let newest = history.first()?;
    let latest = history.iter().find(|p| !p.share_price.is_zero())?;
    let cutoff = newest.timestamp - i64::from(window_days) * SECONDS_PER_DAY;

    let initial = history
        .iter()
        .rev()
        .find(|p| !p.share_price.is_zero() && p.timestamp >= cutoff)?;

    let years = Decimal::from(window_days) / Decimal::from(DAYS_PER_YEAR);
    let growth = latest.share_price - initial.share_price;

    Some(round_to(growth / years * Decimal::ONE_HUNDRED, 2))
}
