//! Interleaving of vault and user histories into one timeline.
//!
//! The vault stream knows the share price, the user stream knows the share
//! balance, and the two are only correlated through their timestamps. Each
//! merged row carries both: the user balance in force at that moment and the
//! vault context (share price, underlying price, TVL, APY) last reported at or
//! before it.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::normalize::{round_to, try_from_fixed_point};
use crate::types::{RawAmount, UserAction, UserBalanceRecord, VaultDecimals, VaultHistoryRecord};

/// Decimal places kept on decoded amounts inside the pipeline.
pub const WORKING_DECIMALS: u32 = 18;

/// A vault history record with decoded prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultPoint {
    pub timestamp: i64,
    pub share_price: Decimal,
    pub price_underlying: Decimal,
    pub tvl: Option<RawAmount>,
    pub apy: Option<RawAmount>,
}

/// A user balance record with a decoded share balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPoint {
    pub timestamp: i64,
    pub value: Decimal,
    pub tx: Option<String>,
    pub action: Option<UserAction>,
}

/// Which stream(s) produced a merged entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntrySource {
    Vault,
    User,
    /// A vault and a user record sharing one timestamp.
    Both,
}

/// One row of the merged timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedEntry {
    pub timestamp: i64,
    /// User share balance.
    pub value: Decimal,
    pub share_price: Decimal,
    pub price_underlying: Decimal,
    pub tvl: Option<RawAmount>,
    pub apy: Option<RawAmount>,
    pub tx: Option<String>,
    pub action: Option<UserAction>,
    pub source: EntrySource,
}

fn decode(raw: &RawAmount, scale: u32, field: &'static str, timestamp: i64) -> Decimal {
    match try_from_fixed_point(raw.as_str(), scale) {
        Some(value) => round_to(value, WORKING_DECIMALS),
        None => {
            tracing::debug!(field, timestamp, raw = raw.as_str(), "unparseable amount, using zero");
            Decimal::ZERO
        }
    }
}

/// Decode vault records, keeping input order.
pub fn normalize_vault_history(
    records: &[VaultHistoryRecord],
    decimals: VaultDecimals,
) -> Vec<VaultPoint> {
    records
        .iter()
        .map(|r| VaultPoint {
            timestamp: r.timestamp,
            share_price: decode(&r.share_price, decimals.share_decimals, "sharePrice", r.timestamp),
            price_underlying: decode(
                &r.price_underlying,
                decimals.underlying_decimals,
                "priceUnderlying",
                r.timestamp,
            ),
            tvl: r.tvl.clone(),
            apy: r.apy.clone(),
        })
        .collect()
}

/// Decode user records, keeping input order.
pub fn normalize_user_history(
    records: &[UserBalanceRecord],
    decimals: VaultDecimals,
) -> Vec<UserPoint> {
    records
        .iter()
        .map(|r| UserPoint {
            timestamp: r.timestamp,
            value: decode(&r.value, decimals.value_decimals, "value", r.timestamp),
            tx: r.tx.clone(),
            action: r.action.clone(),
        })
        .collect()
}

/// Decoded vault history, newest first, duplicates kept.
pub fn vault_points_desc(records: &[VaultHistoryRecord], decimals: VaultDecimals) -> Vec<VaultPoint> {
    let mut points = normalize_vault_history(records, decimals);
    points.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    points
}

/// Keep the first record seen for each timestamp.
///
/// Overlapping pagination windows return the same snapshot twice.
pub fn dedup_by_timestamp(points: Vec<VaultPoint>) -> Vec<VaultPoint> {
    let mut seen = HashSet::with_capacity(points.len());
    points
        .into_iter()
        .filter(|p| seen.insert(p.timestamp))
        .collect()
}

/// Merge both histories into a timeline ordered newest first.
///
/// Vault records are deduplicated by timestamp, then both streams are walked
/// together in time order. A vault record emits a row carrying the user
/// balance in force at that time (zero before the first user record). A user
/// record emits a row carrying the latest vault context at or before it. A
/// vault and a user record with the same timestamp emit a single row.
///
/// The resulting rows are then collapsed on `(value, share_price, tx)`,
/// keeping the newest, and zero prices are replaced by the last non-zero price
/// before them (or, for rows older than every vault record, the oldest one).
pub fn merge_histories(
    vault_records: &[VaultHistoryRecord],
    user_records: &[UserBalanceRecord],
    decimals: VaultDecimals,
) -> Vec<MergedEntry> {
    let mut vault = dedup_by_timestamp(normalize_vault_history(vault_records, decimals));
    let mut user = normalize_user_history(user_records, decimals);
    vault.sort_by_key(|p| p.timestamp);
    user.sort_by_key(|p| p.timestamp);

    let mut merged = interleave(&vault, &user);
    merged.reverse();

    let before = merged.len();
    let mut merged = dedup_states(merged);
    carry_forward_prices(&mut merged);

    tracing::debug!(
        vault_records = vault_records.len(),
        user_records = user_records.len(),
        merged = before,
        collapsed = before - merged.len(),
        "merged vault and user history"
    );

    merged
}

/// Walk both ascending streams and emit rows oldest first.
fn interleave(vault: &[VaultPoint], user: &[UserPoint]) -> Vec<MergedEntry> {
    let mut rows = Vec::with_capacity(vault.len() + user.len());
    let mut context: Option<&VaultPoint> = None;
    let mut value = Decimal::ZERO;
    let (mut i, mut j) = (0, 0);

    loop {
        let (source, timestamp, user_point) = match (vault.get(i), user.get(j)) {
            (Some(v), Some(u)) if v.timestamp == u.timestamp => {
                context = Some(v);
                value = u.value;
                i += 1;
                j += 1;
                (EntrySource::Both, v.timestamp, Some(u))
            }
            (Some(v), Some(u)) if v.timestamp < u.timestamp => {
                context = Some(v);
                i += 1;
                (EntrySource::Vault, v.timestamp, None)
            }
            (Some(v), None) => {
                context = Some(v);
                i += 1;
                (EntrySource::Vault, v.timestamp, None)
            }
            (_, Some(u)) => {
                value = u.value;
                j += 1;
                (EntrySource::User, u.timestamp, Some(u))
            }
            (None, None) => break,
        };

        rows.push(MergedEntry {
            timestamp,
            value,
            share_price: context.map_or(Decimal::ZERO, |c| c.share_price),
            price_underlying: context.map_or(Decimal::ZERO, |c| c.price_underlying),
            tvl: context.and_then(|c| c.tvl.clone()),
            apy: context.and_then(|c| c.apy.clone()),
            tx: user_point.and_then(|u| u.tx.clone()),
            action: user_point.and_then(|u| u.action.clone()),
            source,
        });
    }

    rows
}

/// Collapse rows describing the same logical state, keeping the first.
fn dedup_states(rows: Vec<MergedEntry>) -> Vec<MergedEntry> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|r| seen.insert((r.value, r.share_price, r.tx.clone())))
        .collect()
}

/// Replace zero prices with the last non-zero price before them in time.
///
/// `rows` is newest first, so the walk runs from the back. Rows older than
/// the first priced row (user activity before any vault record) then take the
/// oldest known price, so a zero survives only when no row has a price.
fn carry_forward_prices(rows: &mut [MergedEntry]) {
    let mut share_price = None;
    let mut price_underlying = None;
    for row in rows.iter_mut().rev() {
        carry(&mut row.share_price, &mut share_price);
        carry(&mut row.price_underlying, &mut price_underlying);
    }

    let mut share_price = None;
    let mut price_underlying = None;
    for row in rows.iter_mut() {
        carry(&mut row.share_price, &mut share_price);
        carry(&mut row.price_underlying, &mut price_underlying);
    }
}

fn carry(slot: &mut Decimal, last: &mut Option<Decimal>) {
    if slot.is_zero() {
        if let Some(previous) = *last {
            *slot = previous;
        }
    } else {
        *last = Some(*slot);
    }
}
