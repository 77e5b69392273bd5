//! Conversions between subgraph rows and engine records.

pub mod convert;
pub mod scalars;

pub use convert::{
    convert_allocation_point, convert_allocation_snapshot, convert_user_balance_row,
    convert_vault_history_row,
};
pub use scalars::{normalize_address, parse_timestamp};
