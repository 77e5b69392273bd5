//! Row-to-record conversion.
//!
//! A row without a usable timestamp cannot be placed on a timeline and is
//! rejected (`None`). Every other missing field is carried as an empty raw
//! amount, which the engine decodes to zero.

use autopilot_rs_engine::{
    AllocationPoint, AllocationSnapshot, MarketBalance, UserBalanceRecord,
    VaultHistoryRecord,
};

use crate::queries::allocation::allocation_points::AllocationPointRow;
use crate::queries::allocation::allocation_snapshots::AllocationSnapshotRow;
use crate::queries::history::user_balance_history::UserBalanceRow;
use crate::queries::history::vault_history::VaultHistoryRow;
use crate::types::scalars::parse_timestamp;

pub fn convert_vault_history_row(row: VaultHistoryRow) -> Option<VaultHistoryRecord> {
    let timestamp = parse_timestamp(row.timestamp.as_ref())?;
    Some(VaultHistoryRecord {
        timestamp,
        share_price: row.share_price.unwrap_or_default(),
        price_underlying: row.price_underlying.unwrap_or_default(),
        tvl: row.tvl,
        apy: row.apy,
    })
}

pub fn convert_user_balance_row(row: UserBalanceRow) -> Option<UserBalanceRecord> {
    let timestamp = parse_timestamp(row.timestamp.as_ref())?;
    let mut record = UserBalanceRecord::new(timestamp, row.value.unwrap_or_default());
    record.tx = row.tx;
    if let Some(label) = row.action.as_deref() {
        record = record.with_action(label);
    }
    Some(record)
}

/// Allocation points need both an identifier and an address to be matched.
pub fn convert_allocation_point(row: AllocationPointRow) -> Option<AllocationPoint> {
    Some(AllocationPoint {
        h_vault_id: row.h_vault_id?,
        h_vault_address: row.h_vault_address?,
        apy: row.apy,
    })
}

pub fn convert_allocation_snapshot(row: AllocationSnapshotRow) -> Option<AllocationSnapshot> {
    let timestamp = parse_timestamp(row.timestamp.as_ref())?;
    let market_balances = row
        .market_balances
        .unwrap_or_default()
        .into_iter()
        .map(|m| MarketBalance {
            protocol: m.protocol.unwrap_or_default(),
            market_id: m.market_id,
            balance: m.balance.unwrap_or_default(),
        })
        .collect();

    Some(AllocationSnapshot {
        timestamp,
        total_balance: row.total_balance.unwrap_or_default(),
        market_balances,
    })
}
