//! Allocation metadata and per-market balance snapshot queries.

use autopilot_rs_engine::RawAmount;
use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use super::PagedQuery;

const ALLOCATION_POINTS_QUERY: &str = r"query AllocationPoints($vault: String!, $first: Int!, $skip: Int!) {
  allocationPoints(where: { vault: $vault }, first: $first, skip: $skip) {
    hVaultId
    hVaultAddress
    apy
  }
}
";

const ALLOCATION_SNAPSHOTS_QUERY: &str = r"query AllocationSnapshots($vault: String!, $first: Int!, $skip: Int!) {
  allocationSnapshots(
    where: { vault: $vault }
    first: $first
    skip: $skip
    orderBy: timestamp
    orderDirection: desc
  ) {
    timestamp
    totalBalance
    marketBalances {
      protocol
      marketId
      balance
    }
  }
}
";

/// Query for the markets a vault can allocate to.
pub struct AllocationPoints;

pub mod allocation_points {
    use super::{Deserialize, RawAmount, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub vault: String,
        pub first: i64,
        pub skip: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub allocation_points: Vec<AllocationPointRow>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AllocationPointRow {
        #[serde(default)]
        pub h_vault_id: Option<String>,
        #[serde(default)]
        pub h_vault_address: Option<String>,
        #[serde(default)]
        pub apy: Option<RawAmount>,
    }
}

impl GraphQLQuery for AllocationPoints {
    type Variables = allocation_points::Variables;
    type ResponseData = allocation_points::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: ALLOCATION_POINTS_QUERY,
            operation_name: "AllocationPoints",
        }
    }
}

impl PagedQuery for AllocationPoints {
    type Item = allocation_points::AllocationPointRow;

    fn with_page(variables: &Self::Variables, first: i64, skip: i64) -> Self::Variables {
        allocation_points::Variables {
            first,
            skip,
            ..variables.clone()
        }
    }

    fn into_items(data: Self::ResponseData) -> Vec<Self::Item> {
        data.allocation_points
    }
}

/// Query for a vault's per-market balance snapshots.
pub struct AllocationSnapshots;

pub mod allocation_snapshots {
    use super::{Deserialize, RawAmount, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub vault: String,
        pub first: i64,
        pub skip: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub allocation_snapshots: Vec<AllocationSnapshotRow>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AllocationSnapshotRow {
        #[serde(default)]
        pub timestamp: Option<RawAmount>,
        #[serde(default)]
        pub total_balance: Option<RawAmount>,
        #[serde(default)]
        pub market_balances: Option<Vec<MarketBalanceRow>>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MarketBalanceRow {
        #[serde(default)]
        pub protocol: Option<String>,
        #[serde(default)]
        pub market_id: Option<String>,
        #[serde(default)]
        pub balance: Option<RawAmount>,
    }
}

impl GraphQLQuery for AllocationSnapshots {
    type Variables = allocation_snapshots::Variables;
    type ResponseData = allocation_snapshots::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: ALLOCATION_SNAPSHOTS_QUERY,
            operation_name: "AllocationSnapshots",
        }
    }
}

impl PagedQuery for AllocationSnapshots {
    type Item = allocation_snapshots::AllocationSnapshotRow;

    fn with_page(variables: &Self::Variables, first: i64, skip: i64) -> Self::Variables {
        allocation_snapshots::Variables {
            first,
            skip,
            ..variables.clone()
        }
    }

    fn into_items(data: Self::ResponseData) -> Vec<Self::Item> {
        data.allocation_snapshots
    }
}
