//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Autopilot CLI - Vault earnings and allocation analytics
#[derive(Parser, Debug)]
#[command(name = "autopilot")]
#[command(about = "CLI tool for Autopilot vault earnings and allocations", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Subgraph GraphQL endpoint
    #[arg(long, global = true, env = "AUTOPILOT_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show an account's earnings, flows and yield in a vault
    Metrics(PositionArgs),
    /// Show an account's classified event history in a vault
    History(HistoryArgs),
    /// Show a vault's current allocation across markets
    Allocations(AllocationArgs),
    /// Show a vault's past allocation distributions
    Rebalances(RebalanceArgs),
}

#[derive(Args, Debug)]
pub struct PositionArgs {
    /// Vault address
    pub vault: String,

    /// Account address
    pub account: String,

    #[command(flatten)]
    pub decimals: DecimalsArgs,

    /// Unix timestamp used as "now" (default: the system clock)
    #[arg(long)]
    pub now: Option<i64>,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub position: PositionArgs,

    /// Limit the number of events shown
    #[arg(short = 'n', long, default_value = "25")]
    pub limit: usize,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct DecimalsArgs {
    /// Decimals of the vault share price
    #[arg(long, default_value = "18")]
    pub share_decimals: u32,

    /// Decimals of the underlying price
    #[arg(long, default_value = "18")]
    pub underlying_decimals: u32,

    /// Decimals of the user balance
    #[arg(long, default_value = "8")]
    pub value_decimals: u32,
}

#[derive(Args, Debug)]
pub struct AllocationArgs {
    /// Vault address
    pub vault: String,

    /// Decimals of the vault's underlying asset
    #[arg(long, default_value = "18")]
    pub asset_decimals: u32,
}

#[derive(Args, Debug)]
pub struct RebalanceArgs {
    #[command(flatten)]
    pub allocation: AllocationArgs,

    /// Limit the number of rebalances shown
    #[arg(short = 'n', long, default_value = "10")]
    pub limit: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
