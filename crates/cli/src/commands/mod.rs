//! Command implementations.

pub mod allocations;
pub mod position;

use anyhow::Result;
use autopilot_rs_api::{ClientConfig, Dashboard, SubgraphClient};

pub use allocations::{run_allocations, run_rebalances};
pub use position::{run_history, run_metrics};

/// Create a dashboard over the subgraph at `api_url`, or the default endpoint.
fn dashboard(api_url: Option<&str>) -> Result<Dashboard<SubgraphClient>> {
    let config = ClientConfig::new();
    let config = match api_url {
        Some(url) => config.with_api_url(url.parse()?),
        None => config,
    };
    Ok(Dashboard::new(SubgraphClient::with_config(config)))
}
