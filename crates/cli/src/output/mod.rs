//! Output formatting for CLI results.

pub mod detail;
pub mod table;

pub use detail::format_metrics_detail;
pub use table::{format_allocations_table, format_events_table, format_rebalances_table};

use rust_decimal::{Decimal, RoundingStrategy};

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Underlying amount, trimmed to 6 places.
fn format_amount(value: Decimal) -> String {
    value.round_dp(6).normalize().to_string()
}

fn format_usd(value: Decimal) -> String {
    let million = Decimal::from(1_000_000);
    let thousand = Decimal::from(1_000);
    if value.abs() >= million {
        format!("${:.2}M", round2(value / million))
    } else if value.abs() >= thousand {
        format!("${:.2}K", round2(value / thousand))
    } else {
        format!("${:.2}", round2(value))
    }
}

fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", round2(value))
}

fn truncate_address(addr: &str) -> String {
    if addr.len() > 10 {
        format!("{}...{}", &addr[..6], &addr[addr.len() - 4..])
    } else {
        addr.to_string()
    }
}
