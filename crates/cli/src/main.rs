//! Autopilot CLI - Vault earnings and allocation analytics.

#![expect(clippy::print_stdout, reason = "results are written to stdout")]

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{run_allocations, run_history, run_metrics, run_rebalances};

/// Log to stderr so JSON on stdout stays machine-readable.
fn init_logger() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();
    let api_url = cli.api_url.as_deref();

    match cli.command {
        Commands::Metrics(args) => {
            run_metrics(&args, cli.format, api_url).await?;
        }
        Commands::History(args) => {
            run_history(&args, cli.format, api_url).await?;
        }
        Commands::Allocations(args) => {
            run_allocations(&args, cli.format, api_url).await?;
        }
        Commands::Rebalances(args) => {
            run_rebalances(&args, cli.format, api_url).await?;
        }
    }

    Ok(())
}
