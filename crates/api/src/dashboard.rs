//! Fetch-and-compute orchestration for one vault.

use autopilot_rs_engine::{
    allocation_legend, compute_allocation_time_series, compute_current_allocations,
    compute_metrics, compute_rebalance_events, latest_snapshot, AllocationEntry, Metrics,
    RebalanceEvent, SeriesLegend, TimeSeriesRow, VaultDecimals,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::source::HistorySource;

/// Everything the allocation panel shows for one vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationView {
    /// Allocation of the newest snapshot.
    pub current: Vec<AllocationEntry>,
    /// Chart rows, oldest first.
    pub time_series: Vec<TimeSeriesRow>,
    pub legend: Vec<SeriesLegend>,
    /// Earlier distributions, newest first.
    pub rebalances: Vec<RebalanceEvent>,
}

/// Runs the engine over data fetched from a [`HistorySource`].
///
/// Independent streams are fetched concurrently. Metrics and allocations use
/// disjoint fetches, so one failing never blocks the other.
#[derive(Debug, Clone)]
pub struct Dashboard<S> {
    source: S,
}

impl<S: HistorySource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying data source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Compute an account's metrics, propagating fetch failures.
    pub async fn try_metrics(
        &self,
        vault: &str,
        account: &str,
        decimals: VaultDecimals,
        now: i64,
    ) -> Result<Metrics> {
        let (vault_history, user_history) = tokio::try_join!(
            self.source.vault_history(vault),
            self.source.user_balance_history(vault, account),
        )?;

        tracing::debug!(
            vault,
            vault_records = vault_history.len(),
            user_records = user_history.len(),
            "fetched vault and user history"
        );

        Ok(compute_metrics(&vault_history, &user_history, decimals, now))
    }

    /// Compute an account's metrics, substituting zeroed metrics that carry
    /// the error message when a fetch fails.
    pub async fn metrics(
        &self,
        vault: &str,
        account: &str,
        decimals: VaultDecimals,
        now: i64,
    ) -> Metrics {
        match self.try_metrics(vault, account, decimals, now).await {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::warn!(
                    vault,
                    account,
                    category = ?e.error_category(),
                    error = %e,
                    "metrics unavailable"
                );
                Metrics::failed(e.to_string())
            }
        }
    }

    /// Compute a vault's current allocation, chart rows and rebalance list.
    pub async fn allocations(&self, vault: &str, asset_decimals: u32) -> Result<AllocationView> {
        let (points, snapshots) = tokio::try_join!(
            self.source.allocation_points(vault),
            self.source.allocation_snapshots(vault),
        )?;

        tracing::debug!(
            vault,
            points = points.len(),
            snapshots = snapshots.len(),
            "fetched allocation data"
        );

        let current = latest_snapshot(&snapshots)
            .map(|snapshot| compute_current_allocations(snapshot, &points, asset_decimals))
            .unwrap_or_default();
        let time_series = compute_allocation_time_series(&snapshots, &points, asset_decimals);
        let legend = allocation_legend(&time_series);
        let rebalances = compute_rebalance_events(&snapshots, &points, asset_decimals);

        Ok(AllocationView {
            current,
            time_series,
            legend,
            rebalances,
        })
    }
}
