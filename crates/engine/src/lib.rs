//! Autopilot Vault Analytics Engine
//!
//! Pure, synchronous computations behind the Autopilot vault dashboard. The
//! engine takes raw indexer rows (fixed-point strings) and turns them into
//! display-ready figures. It does no I/O; fetching lives in
//! `autopilot-rs-api`.
//!
//! # Overview
//!
//! - Decode fixed-point integers into decimals ([`normalize`])
//! - Reconcile a vault's price history with one user's balance history into a
//!   single newest-first timeline ([`merge`])
//! - Label each timeline step as a harvest, a conversion or a reversal and
//!   attach balance and net-change figures ([`events`])
//! - Summarise a user's position: earnings, deposits, withdrawals, trailing
//!   APY, forecast and update cadence ([`metrics`])
//! - Aggregate per-market balances into named percentage allocations, chart
//!   rows and rebalance history ([`allocation`])
//!
//! # Example
//!
//! ```rust
//! use autopilot_rs_engine::{
//!     compute_metrics, UserBalanceRecord, VaultDecimals, VaultHistoryRecord,
//! };
//!
//! let vault = vec![
//!     VaultHistoryRecord::new(100, "1000000").with_price_underlying("100000000"),
//!     VaultHistoryRecord::new(200, "1100000").with_price_underlying("100000000"),
//! ];
//! let user = vec![UserBalanceRecord::new(100, "1000000000000000000")];
//!
//! let metrics = compute_metrics(&vault, &user, VaultDecimals::new(18, 6), 300);
//! assert!(metrics.error.is_none());
//! ```
//!
//! All arithmetic uses [`rust_decimal::Decimal`]; nothing in the engine goes
//! through binary floating point.

pub mod allocation;
pub mod apy;
pub mod events;
pub mod format;
pub mod merge;
pub mod metrics;
pub mod naming;
pub mod normalize;
pub mod types;

pub use allocation::{
    allocation_legend, compute_allocation_time_series, compute_current_allocations,
    compute_rebalance_events, latest_snapshot, snapshot_allocations, AllocationEntry,
    AllocationPoint, AllocationSnapshot, MarketBalance, NameBook, RebalanceEvent, SeriesLegend,
    TimeSeriesRow, HISTORY_THRESHOLD, RAW_ASSET_PROTOCOL,
};
pub use apy::trailing_apy;
pub use events::{classify_timeline, EnrichedEvent, EventKind};
pub use format::{format_date, format_duration, PLACEHOLDER};
pub use merge::{
    merge_histories, normalize_user_history, normalize_vault_history, vault_points_desc,
    EntrySource, MergedEntry, UserPoint, VaultPoint, WORKING_DECIMALS,
};
pub use metrics::{
    compute_metrics, monthly_forecast, summarize, FlowEntry, Metrics, APY_WINDOW_LONG,
    APY_WINDOW_SHORT,
};
pub use naming::{color_for, display_name, fallback_name, NOT_INVESTED, UNKNOWN_VAULT};
pub use normalize::{from_fixed_point, to_fixed_point, try_from_fixed_point};
pub use types::{
    RawAmount, UserAction, UserBalanceRecord, VaultDecimals, VaultHistoryRecord,
    DEFAULT_VALUE_DECIMALS,
};
