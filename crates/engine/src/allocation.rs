//! Aggregation of per-market vault balances into named percentage
//! allocations.
//!
//! A snapshot lists the vault's total balance and the balance held in each
//! market. Markets holding the raw asset ([`RAW_ASSET_PROTOCOL`]) are idle
//! buffer: they are left out of the allocation list but stay in the total, so
//! displayed percentages under-sum whenever a buffer exists.

use std::collections::{BTreeMap, HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::merge::WORKING_DECIMALS;
use crate::naming::{color_for, display_name, fallback_name};
use crate::normalize::{round_to, try_from_fixed_point};
use crate::types::RawAmount;

/// Protocol tag of markets that hold undeployed asset.
pub const RAW_ASSET_PROTOCOL: &str = "erc20";

/// Minimum percentage shown in historical views (charts, rebalance list).
pub const HISTORY_THRESHOLD: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Balance held by the vault in one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketBalance {
    pub protocol: String,
    #[serde(default)]
    pub market_id: Option<String>,
    pub balance: RawAmount,
}

/// The vault's per-market balances at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSnapshot {
    pub timestamp: i64,
    pub total_balance: RawAmount,
    pub market_balances: Vec<MarketBalance>,
}

/// Static metadata about an allocation point (a market the vault can use).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPoint {
    /// Structured identifier, e.g. `morpho_YOG_USDC`.
    pub h_vault_id: String,
    /// Market address, matched case-insensitively against `marketId`.
    pub h_vault_address: String,
    #[serde(default)]
    pub apy: Option<RawAmount>,
}

/// One named allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub name: String,
    /// Share of the vault total, rounded to 2 places.
    pub percentage: Decimal,
    /// Underlying units.
    pub amount: Decimal,
    pub color: String,
}

/// A historical allocation distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceEvent {
    /// 1 for the most recent historical snapshot.
    pub id: usize,
    pub timestamp: i64,
    /// Sorted by percentage, largest first.
    pub allocations: Vec<AllocationEntry>,
}

/// One chart row: percentage per category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    pub timestamp: i64,
    #[serde(flatten)]
    pub allocations: BTreeMap<String, Decimal>,
}

/// A chart series name and its colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesLegend {
    pub name: String,
    pub color: String,
}

/// Resolves market identifiers to display names.
#[derive(Debug, Clone, Default)]
pub struct NameBook {
    by_address: HashMap<String, String>,
}

impl NameBook {
    /// Index allocation points by lower-cased address.
    pub fn new(points: &[AllocationPoint]) -> Self {
        let by_address = points
            .iter()
            .map(|p| (p.h_vault_address.to_lowercase(), display_name(&p.h_vault_id)))
            .collect();
        Self { by_address }
    }

    /// Display name for a market.
    pub fn resolve(&self, market_id: Option<&str>) -> String {
        market_id
            .and_then(|id| self.by_address.get(&id.to_lowercase()).cloned())
            .unwrap_or_else(|| fallback_name(market_id))
    }
}

/// Named allocations of one snapshot, unfiltered, in first-seen order.
///
/// Balances are decoded at `asset_decimals` before any arithmetic, so raw
/// totals beyond what a `Decimal` mantissa holds still divide correctly.
/// Markets resolving to the same name are summed before the percentage is
/// taken. Returns nothing when the total balance is not positive.
pub fn snapshot_allocations(
    snapshot: &AllocationSnapshot,
    names: &NameBook,
    asset_decimals: u32,
) -> Vec<AllocationEntry> {
    let total = parse_raw(&snapshot.total_balance, asset_decimals, snapshot.timestamp);
    if total <= Decimal::ZERO {
        return Vec::new();
    }

    let mut grouped: Vec<(String, Decimal)> = Vec::new();
    for market in &snapshot.market_balances {
        if market.protocol.eq_ignore_ascii_case(RAW_ASSET_PROTOCOL) {
            continue;
        }

        let name = names.resolve(market.market_id.as_deref());
        let balance = parse_raw(&market.balance, asset_decimals, snapshot.timestamp);
        match grouped.iter_mut().find(|(n, _)| *n == name) {
            Some((_, sum)) => *sum += balance,
            None => grouped.push((name, balance)),
        }
    }

    grouped
        .into_iter()
        .map(|(name, balance)| {
            let ratio = balance.checked_div(total).unwrap_or(Decimal::ZERO);
            AllocationEntry {
                color: color_for(&name).to_string(),
                percentage: round_to(ratio * Decimal::ONE_HUNDRED, 2),
                amount: round_to(balance, WORKING_DECIMALS),
                name,
            }
        })
        .collect()
}

/// Current allocation list: positive percentages, largest first.
pub fn compute_current_allocations(
    snapshot: &AllocationSnapshot,
    meta: &[AllocationPoint],
    asset_decimals: u32,
) -> Vec<AllocationEntry> {
    let names = NameBook::new(meta);
    let mut entries = snapshot_allocations(snapshot, &names, asset_decimals);
    entries.retain(|e| e.percentage > Decimal::ZERO);
    sort_by_percentage(&mut entries);
    entries
}

/// Percentage rows for charting, oldest first.
///
/// Rows with no category above zero are dropped.
pub fn compute_allocation_time_series(
    history: &[AllocationSnapshot],
    meta: &[AllocationPoint],
    asset_decimals: u32,
) -> Vec<TimeSeriesRow> {
    let names = NameBook::new(meta);
    let mut rows: Vec<TimeSeriesRow> = history
        .iter()
        .filter_map(|snapshot| {
            let allocations: BTreeMap<String, Decimal> =
                snapshot_allocations(snapshot, &names, asset_decimals)
                    .into_iter()
                    .filter(|e| e.percentage > Decimal::ZERO)
                    .map(|e| (e.name, e.percentage))
                    .collect();
            (!allocations.is_empty()).then_some(TimeSeriesRow {
                timestamp: snapshot.timestamp,
                allocations,
            })
        })
        .collect();

    rows.sort_by_key(|r| r.timestamp);
    rows
}

/// Historical allocation distributions, newest first, numbered from 1.
///
/// The newest snapshot is the current allocation and is not part of the list.
/// Entries at or below [`HISTORY_THRESHOLD`] are hidden, and snapshots left
/// with no entries are dropped before numbering.
pub fn compute_rebalance_events(
    history: &[AllocationSnapshot],
    meta: &[AllocationPoint],
    asset_decimals: u32,
) -> Vec<RebalanceEvent> {
    let names = NameBook::new(meta);
    let mut ordered: Vec<&AllocationSnapshot> = history.iter().collect();
    ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    ordered
        .into_iter()
        .skip(1)
        .filter_map(|snapshot| {
            let mut allocations = snapshot_allocations(snapshot, &names, asset_decimals);
            allocations.retain(|e| e.percentage > HISTORY_THRESHOLD);
            sort_by_percentage(&mut allocations);
            (!allocations.is_empty()).then_some((snapshot.timestamp, allocations))
        })
        .enumerate()
        .map(|(index, (timestamp, allocations))| RebalanceEvent {
            id: index + 1,
            timestamp,
            allocations,
        })
        .collect()
}

/// Newest snapshot of a history, if any.
pub fn latest_snapshot(history: &[AllocationSnapshot]) -> Option<&AllocationSnapshot> {
    history.iter().max_by_key(|s| s.timestamp)
}

/// Series names across all rows, in order of first appearance, with colours.
pub fn allocation_legend(rows: &[TimeSeriesRow]) -> Vec<SeriesLegend> {
    let mut seen = HashSet::new();
    rows.iter()
        .flat_map(|row| row.allocations.keys())
        .filter(|name| seen.insert(name.as_str()))
        .map(|name| SeriesLegend {
            name: name.clone(),
            color: color_for(name).to_string(),
        })
        .collect()
}

fn parse_raw(raw: &RawAmount, asset_decimals: u32, timestamp: i64) -> Decimal {
    try_from_fixed_point(raw.as_str(), asset_decimals).unwrap_or_else(|| {
        tracing::debug!(timestamp, raw = raw.as_str(), "unparseable allocation balance, using zero");
        Decimal::ZERO
    })
}

fn sort_by_percentage(entries: &mut [AllocationEntry]) {
    entries.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn market(protocol: &str, market_id: Option<&str>, balance: &str) -> MarketBalance {
        MarketBalance {
            protocol: protocol.to_string(),
            market_id: market_id.map(str::to_string),
            balance: RawAmount::from(balance),
        }
    }

    fn snapshot(timestamp: i64, total: &str, markets: Vec<MarketBalance>) -> AllocationSnapshot {
        AllocationSnapshot {
            timestamp,
            total_balance: RawAmount::from(total),
            market_balances: markets,
        }
    }

    fn meta() -> Vec<AllocationPoint> {
        vec![
            AllocationPoint {
                h_vault_id: "morpho_YOG_USDC".to_string(),
                h_vault_address: "0xAAAA000000000000000000000000000000000001".to_string(),
                apy: None,
            },
            AllocationPoint {
                h_vault_id: "fluid_USDC".to_string(),
                h_vault_address: "0xbbbb000000000000000000000000000000000002".to_string(),
                apy: None,
            },
        ]
    }

    const MORPHO: &str = "0xaaaa000000000000000000000000000000000001";
    const FLUID: &str = "0xBBBB000000000000000000000000000000000002";

    #[test]
    fn test_current_allocation_excludes_raw_asset() {
        let snap = snapshot(
            100,
            "1000",
            vec![
                market("erc20", None, "500"),
                market("morpho", Some("0xA"), "500"),
            ],
        );

        let entries = compute_current_allocations(&snap, &[], 0);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Vault 0xA...");
        assert_eq!(entries[0].percentage, dec!(50.00));
    }

    #[test]
    fn test_current_allocation_chain_scale_balances() {
        // Raw totals above the Decimal mantissa limit (~7.9e28).
        let total = format!("1{}", "0".repeat(29));
        let half = format!("5{}", "0".repeat(28));
        let snap = snapshot(
            100,
            &total,
            vec![
                market("erc20", None, &half),
                market("morpho", Some(MORPHO), &half),
            ],
        );

        let entries = compute_current_allocations(&snap, &meta(), 18);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Morpho YOG USDC");
        assert_eq!(entries[0].percentage, dec!(50));
        assert_eq!(entries[0].amount, dec!(50000000000));

        let rows = compute_allocation_time_series(&[snap], &meta(), 18);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].allocations["Morpho YOG USDC"], dec!(50));
    }

    #[test]
    fn test_raw_asset_protocol_is_case_insensitive() {
        let snap = snapshot(100, "10", vec![market("ERC20", None, "10")]);
        assert!(compute_current_allocations(&snap, &[], 0).is_empty());
    }

    #[test]
    fn test_current_allocation_zero_total_is_empty() {
        let snap = snapshot(100, "0", vec![market("morpho", Some(MORPHO), "500")]);
        assert!(compute_current_allocations(&snap, &meta(), 6).is_empty());

        let snap = snapshot(100, "not-a-number", vec![market("morpho", Some(MORPHO), "5")]);
        assert!(compute_current_allocations(&snap, &meta(), 6).is_empty());
    }

    #[test]
    fn test_current_allocation_names_sorting_and_amounts() {
        let snap = snapshot(
            100,
            "4000000",
            vec![
                market("morpho", Some(MORPHO), "1000000"),
                market("fluid", Some(FLUID), "3000000"),
            ],
        );

        let entries = compute_current_allocations(&snap, &meta(), 6);

        assert_eq!(entries[0].name, "Fluid USDC");
        assert_eq!(entries[0].percentage, dec!(75));
        assert_eq!(entries[0].amount, dec!(3));
        assert_eq!(entries[1].name, "Morpho YOG USDC");
        assert_eq!(entries[1].percentage, dec!(25));
        assert_eq!(entries[1].color, color_for("Morpho YOG USDC"));
    }

    #[test]
    fn test_unknown_market_id() {
        let snap = snapshot(100, "10", vec![market("morpho", None, "10")]);

        let entries = compute_current_allocations(&snap, &meta(), 0);

        assert_eq!(entries[0].name, "Unknown Vault");
    }

    #[test]
    fn test_percentages_sum_to_hundred_without_buffer() {
        let snap = snapshot(
            100,
            "3",
            vec![
                market("morpho", Some("0x01"), "1"),
                market("morpho", Some("0x02"), "1"),
                market("morpho", Some("0x03"), "1"),
            ],
        );

        let names = NameBook::new(&[]);
        let total: Decimal = snapshot_allocations(&snap, &names, 0)
            .iter()
            .map(|e| e.percentage)
            .sum();

        assert!((total - dec!(100)).abs() <= dec!(0.02));
    }

    #[test]
    fn test_same_name_markets_are_summed() {
        let snap = snapshot(
            100,
            "100",
            vec![
                market("morpho", Some(MORPHO), "20"),
                market("morpho", Some(&MORPHO.to_uppercase().replace("0X", "0x")), "30"),
            ],
        );

        let entries = compute_current_allocations(&snap, &meta(), 0);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].percentage, dec!(50));
    }

    #[test]
    fn test_time_series_oldest_first_and_drops_empty_rows() {
        let history = vec![
            snapshot(300, "100", vec![market("morpho", Some(MORPHO), "100")]),
            snapshot(100, "100", vec![market("fluid", Some(FLUID), "60"), market("morpho", Some(MORPHO), "40")]),
            snapshot(200, "100", vec![market("erc20", None, "100")]),
        ];

        let rows = compute_allocation_time_series(&history, &meta(), 6);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp, 100);
        assert_eq!(rows[0].allocations.get("Fluid USDC"), Some(&dec!(60)));
        assert_eq!(rows[1].timestamp, 300);
        assert_eq!(rows[1].allocations.get("Morpho YOG USDC"), Some(&dec!(100)));

        let legend = allocation_legend(&rows);
        let names: Vec<&str> = legend.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Fluid USDC", "Morpho YOG USDC"]);
    }

    #[test]
    fn test_time_series_row_serializes_flat() {
        let history = vec![snapshot(100, "10", vec![market("fluid", Some(FLUID), "10")])];

        let rows = compute_allocation_time_series(&history, &meta(), 6);
        let json = serde_json::to_value(&rows[0]).unwrap();

        assert_eq!(json["timestamp"], 100);
        let fluid: Decimal = json["Fluid USDC"].as_str().unwrap().parse().unwrap();
        assert_eq!(fluid, dec!(100));
    }

    #[test]
    fn test_rebalance_events_skip_current_and_number_by_recency() {
        let history = vec![
            snapshot(100, "100", vec![market("fluid", Some(FLUID), "100")]),
            snapshot(400, "100", vec![market("morpho", Some(MORPHO), "100")]),
            snapshot(300, "100", vec![market("erc20", None, "100")]),
            snapshot(200, "100", vec![market("fluid", Some(FLUID), "70"), market("morpho", Some(MORPHO), "30")]),
        ];

        let events = compute_rebalance_events(&history, &meta(), 0);

        // 400 is the current allocation; 300 holds only buffer.
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, 1);
        assert_eq!(events[0].timestamp, 200);
        assert_eq!(events[0].allocations[0].name, "Fluid USDC");
        assert_eq!(events[0].allocations[1].name, "Morpho YOG USDC");
        assert_eq!(events[1].id, 2);
        assert_eq!(events[1].timestamp, 100);
    }

    #[test]
    fn test_rebalance_events_hide_dust() {
        let history = vec![
            snapshot(200, "1", vec![market("fluid", Some(FLUID), "1")]),
            snapshot(
                100,
                "100000",
                vec![
                    market("fluid", Some(FLUID), "99990"),
                    market("morpho", Some(MORPHO), "10"),
                ],
            ),
        ];

        let events = compute_rebalance_events(&history, &meta(), 0);

        // Morpho sits at exactly 0.01% and is hidden.
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].allocations.len(), 1);
        assert_eq!(events[0].allocations[0].percentage, dec!(99.99));
    }

    #[test]
    fn test_latest_snapshot() {
        let history = vec![
            snapshot(100, "1", vec![]),
            snapshot(300, "1", vec![]),
            snapshot(200, "1", vec![]),
        ];
        assert_eq!(latest_snapshot(&history).map(|s| s.timestamp), Some(300));
        assert!(latest_snapshot(&[]).is_none());
    }

    #[test]
    fn test_snapshot_deserializes_from_camel_case() {
        let snap: AllocationSnapshot = serde_json::from_str(
            r#"{"timestamp":1,"totalBalance":"10","marketBalances":[{"protocol":"morpho","marketId":"0x1","balance":10}]}"#,
        )
        .unwrap();

        assert_eq!(snap.market_balances[0].market_id.as_deref(), Some("0x1"));
        assert_eq!(snap.market_balances[0].balance.as_str(), "10");
    }
}
