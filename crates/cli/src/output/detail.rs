//! Detailed output formatting for a single account position.

use autopilot_rs_api::engine::{Metrics, PLACEHOLDER};
use colored::Colorize;
use rust_decimal::Decimal;

use super::{format_amount, format_percent, format_usd};

fn format_apy(apy: Option<Decimal>) -> String {
    apy.map_or_else(|| PLACEHOLDER.to_string(), format_percent)
}

pub fn format_metrics_detail(metrics: &Metrics, vault: &str, account: &str) -> String {
    let mut output = String::new();

    // Header
    output.push_str(&format!("{}\n", "=".repeat(60)));
    output.push_str(&format!("{}\n", "Vault Position".bold()));
    output.push_str(&format!("{}\n\n", "=".repeat(60)));
    output.push_str(&format!("  Vault:   {}\n", vault));
    output.push_str(&format!("  Account: {}\n\n", account));

    if let Some(error) = &metrics.error {
        output.push_str(&format!("{}\n", "Unavailable".yellow().bold()));
        output.push_str(&format!("  {}\n\n", error));
    }

    output.push_str(&format!("{}\n", "Balance".cyan().bold()));
    output.push_str(&format!(
        "  Current:          {} ({})\n\n",
        format_amount(metrics.current_balance),
        format_usd(metrics.current_balance_usd)
    ));

    output.push_str(&format!("{}\n", "Earnings".cyan().bold()));
    output.push_str(&format!(
        "  Total:            {} ({})\n",
        format_amount(metrics.total_earnings),
        format_usd(metrics.total_earnings_usd)
    ));
    output.push_str(&format!(
        "  Since last flow:  {} ({})\n\n",
        format_amount(metrics.latest_earnings),
        format_usd(metrics.latest_earnings_usd)
    ));

    output.push_str(&format!("{}\n", "Flows".cyan().bold()));
    output.push_str(&format!(
        "  Deposited:        {} ({} deposits)\n",
        format_amount(metrics.total_deposited),
        metrics.deposits.len()
    ));
    output.push_str(&format!(
        "  Withdrawn:        {} ({} withdrawals)\n\n",
        format_amount(metrics.total_withdrawn),
        metrics.withdrawals.len()
    ));

    output.push_str(&format!("{}\n", "Yield".cyan().bold()));
    output.push_str(&format!("  APY (7d):         {}\n", format_apy(metrics.apy_7d)));
    output.push_str(&format!("  APY (30d):        {}\n", format_apy(metrics.apy_30d)));
    output.push_str(&format!(
        "  Monthly forecast: {}\n\n",
        format_amount(metrics.monthly_forecast)
    ));

    output.push_str(&format!("{}\n", "Activity".cyan().bold()));
    output.push_str(&format!("  Harvests:         {}\n", metrics.harvest_count));
    output.push_str(&format!("  Frequency:        {}\n", metrics.frequency));
    output.push_str(&format!("  Latest update:    {}\n", metrics.latest_update));
    output.push_str(&format!("  Operating since:  {}\n", metrics.operating_since));

    output
}
