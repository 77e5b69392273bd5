//! Per-account command implementations.

use anyhow::{bail, Result};
use autopilot_rs_api::VaultDecimals;
use chrono::Utc;

use super::dashboard;
use crate::cli::{DecimalsArgs, HistoryArgs, OutputFormat, PositionArgs};
use crate::output::{format_events_table, format_metrics_detail};

fn vault_decimals(args: DecimalsArgs) -> VaultDecimals {
    VaultDecimals::new(args.share_decimals, args.underlying_decimals)
        .with_value_decimals(args.value_decimals)
}

pub async fn run_metrics(
    args: &PositionArgs,
    format: OutputFormat,
    api_url: Option<&str>,
) -> Result<()> {
    let dashboard = dashboard(api_url)?;
    let now = args.now.unwrap_or_else(|| Utc::now().timestamp());

    let metrics = dashboard
        .metrics(&args.vault, &args.account, vault_decimals(args.decimals), now)
        .await;

    match format {
        OutputFormat::Table => {
            println!("{}", format_metrics_detail(&metrics, &args.vault, &args.account));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&metrics)?;
            println!("{}", json);
        }
    }

    // The zeroed view is still printed; the exit status reports the failure.
    if let Some(error) = &metrics.error {
        bail!("metrics unavailable: {error}");
    }

    Ok(())
}

pub async fn run_history(
    args: &HistoryArgs,
    format: OutputFormat,
    api_url: Option<&str>,
) -> Result<()> {
    let position = &args.position;
    let dashboard = dashboard(api_url)?;
    let now = position.now.unwrap_or_else(|| Utc::now().timestamp());

    let metrics = dashboard
        .try_metrics(
            &position.vault,
            &position.account,
            vault_decimals(position.decimals),
            now,
        )
        .await?;

    let mut events = metrics.events;
    events.truncate(args.limit);

    match format {
        OutputFormat::Table => {
            println!("{}", format_events_table(&events));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&events)?;
            println!("{}", json);
        }
    }

    Ok(())
}
