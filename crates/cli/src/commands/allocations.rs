//! Vault allocation command implementations.

use anyhow::Result;

use super::dashboard;
use crate::cli::{AllocationArgs, OutputFormat, RebalanceArgs};
use crate::output::{format_allocations_table, format_rebalances_table};

pub async fn run_allocations(
    args: &AllocationArgs,
    format: OutputFormat,
    api_url: Option<&str>,
) -> Result<()> {
    let dashboard = dashboard(api_url)?;
    let view = dashboard.allocations(&args.vault, args.asset_decimals).await?;

    match format {
        OutputFormat::Table => {
            println!("{}", format_allocations_table(&view.current));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&view)?;
            println!("{}", json);
        }
    }

    Ok(())
}

pub async fn run_rebalances(
    args: &RebalanceArgs,
    format: OutputFormat,
    api_url: Option<&str>,
) -> Result<()> {
    let allocation = &args.allocation;
    let dashboard = dashboard(api_url)?;
    let view = dashboard
        .allocations(&allocation.vault, allocation.asset_decimals)
        .await?;

    let mut rebalances = view.rebalances;
    rebalances.truncate(args.limit);

    match format {
        OutputFormat::Table => {
            println!("{}", format_rebalances_table(&rebalances));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rebalances)?;
            println!("{}", json);
        }
    }

    Ok(())
}
