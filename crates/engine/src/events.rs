//! Classification of merged timeline rows into harvests, deposits and
//! withdrawals.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::merge::{EntrySource, MergedEntry};
use crate::types::UserAction;

/// What happened between a row and the row before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Share balance unchanged; only the share price moved.
    Harvest,
    /// Share balance increased (deposit), or the oldest row.
    Convert,
    /// Share balance decreased (withdrawal).
    Revert,
}

impl EventKind {
    /// Classify a share balance against the previous one.
    pub fn between(value: Decimal, previous: Option<Decimal>) -> Self {
        match previous {
            None => Self::Convert,
            Some(previous) if value == previous => Self::Harvest,
            Some(previous) if value > previous => Self::Convert,
            Some(_) => Self::Revert,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Harvest => "Harvest",
            Self::Convert => "Convert",
            Self::Revert => "Revert",
        };
        f.write_str(label)
    }
}

/// A classified timeline row with derived balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedEvent {
    pub timestamp: i64,
    pub event: EventKind,
    /// User share balance.
    pub value: Decimal,
    pub share_price: Decimal,
    pub price_underlying: Decimal,
    /// `value * share_price`, in underlying units.
    pub balance: Decimal,
    /// `balance * price_underlying`.
    pub balance_usd: Decimal,
    /// Balance change against the previous row.
    pub net_change: Decimal,
    pub net_change_usd: Decimal,
    pub tx: Option<String>,
    pub action: Option<UserAction>,
    pub source: EntrySource,
}

fn balance_of(entry: &MergedEntry) -> Decimal {
    entry.value * entry.share_price
}

/// Classify a newest-first timeline.
///
/// Each row is compared with the row after it (the next older one). A row
/// whose share balance is zero is dropped when the older row is also zero or
/// missing: both sides are empty positions and no event took place. Dropped
/// rows still serve as the comparison point for their newer neighbour.
pub fn classify_timeline(timeline: &[MergedEntry]) -> Vec<EnrichedEvent> {
    let mut events = Vec::with_capacity(timeline.len());

    for (i, item) in timeline.iter().enumerate() {
        let next = timeline.get(i + 1);

        if item.value.is_zero() && next.map_or(true, |n| n.value.is_zero()) {
            continue;
        }

        let balance = balance_of(item);
        let net_change = match next {
            Some(n) => balance - balance_of(n),
            None => balance,
        };

        events.push(EnrichedEvent {
            timestamp: item.timestamp,
            event: EventKind::between(item.value, next.map(|n| n.value)),
            value: item.value,
            share_price: item.share_price,
            price_underlying: item.price_underlying,
            balance,
            balance_usd: balance * item.price_underlying,
            net_change,
            net_change_usd: net_change * item.price_underlying,
            tx: item.tx.clone(),
            action: item.action.clone(),
            source: item.source,
        });
    }

    events
}
