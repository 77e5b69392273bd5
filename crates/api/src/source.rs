//! The fetch seam between the dashboard and a data backend.

use async_trait::async_trait;
use autopilot_rs_engine::{
    AllocationPoint, AllocationSnapshot, UserBalanceRecord, VaultHistoryRecord,
};

use crate::client::SubgraphClient;
use crate::error::Result;

/// Read-only access to the raw record streams of a vault.
///
/// Implementations may return records in any order and may include duplicate
/// timestamps; the engine sorts and deduplicates.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Share-price history of a vault.
    async fn vault_history(&self, vault: &str) -> Result<Vec<VaultHistoryRecord>>;

    /// Balance history of one account in a vault.
    async fn user_balance_history(
        &self,
        vault: &str,
        account: &str,
    ) -> Result<Vec<UserBalanceRecord>>;

    /// Markets the vault can allocate to.
    async fn allocation_points(&self, vault: &str) -> Result<Vec<AllocationPoint>>;

    /// Per-market balance snapshots of a vault.
    async fn allocation_snapshots(&self, vault: &str) -> Result<Vec<AllocationSnapshot>>;
}

#[async_trait]
impl HistorySource for SubgraphClient {
    async fn vault_history(&self, vault: &str) -> Result<Vec<VaultHistoryRecord>> {
        self.get_vault_history(vault).await
    }

    async fn user_balance_history(
        &self,
        vault: &str,
        account: &str,
    ) -> Result<Vec<UserBalanceRecord>> {
        self.get_user_balance_history(vault, account).await
    }

    async fn allocation_points(&self, vault: &str) -> Result<Vec<AllocationPoint>> {
        self.get_allocation_points(vault).await
    }

    async fn allocation_snapshots(&self, vault: &str) -> Result<Vec<AllocationSnapshot>> {
        self.get_allocation_snapshots(vault).await
    }
}
