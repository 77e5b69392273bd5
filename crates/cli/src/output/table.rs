//! Table formatting for event, allocation and rebalance lists.

use autopilot_rs_api::engine::{format_date, AllocationEntry, EnrichedEvent, RebalanceEvent};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use super::{format_amount, format_percent, format_usd, truncate_address};

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Net Change")]
    net_change: String,
    #[tabled(rename = "Net Change (USD)")]
    net_change_usd: String,
    #[tabled(rename = "Share Price")]
    share_price: String,
    #[tabled(rename = "Tx")]
    tx: String,
}

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Market")]
    name: String,
    #[tabled(rename = "Allocation")]
    percentage: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Color")]
    color: String,
}

#[derive(Tabled)]
struct RebalanceRow {
    #[tabled(rename = "#")]
    id: usize,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Allocation")]
    allocations: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()));

    table.to_string()
}

pub fn format_events_table(events: &[EnrichedEvent]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }

    let rows: Vec<EventRow> = events
        .iter()
        .map(|e| EventRow {
            date: format_date(e.timestamp),
            event: e.event.to_string(),
            balance: format_amount(e.balance),
            net_change: format_amount(e.net_change),
            net_change_usd: format_usd(e.net_change_usd),
            share_price: format_amount(e.share_price),
            tx: e
                .tx
                .as_deref()
                .map_or_else(|| "-".to_string(), truncate_address),
        })
        .collect();

    render(rows)
}

pub fn format_allocations_table(entries: &[AllocationEntry]) -> String {
    if entries.is_empty() {
        return "No allocations found.".to_string();
    }

    let rows: Vec<AllocationRow> = entries
        .iter()
        .map(|e| AllocationRow {
            name: e.name.clone(),
            percentage: format_percent(e.percentage),
            amount: format_amount(e.amount),
            color: e.color.clone(),
        })
        .collect();

    render(rows)
}

pub fn format_rebalances_table(events: &[RebalanceEvent]) -> String {
    if events.is_empty() {
        return "No rebalances found.".to_string();
    }

    let rows: Vec<RebalanceRow> = events
        .iter()
        .map(|e| RebalanceRow {
            id: e.id,
            date: format_date(e.timestamp),
            allocations: e
                .allocations
                .iter()
                .map(|a| format!("{} {}", a.name, format_percent(a.percentage)))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    render(rows)
}
