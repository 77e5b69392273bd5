//! Vault share-price history and user balance history queries.

use autopilot_rs_engine::RawAmount;
use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use super::PagedQuery;

const VAULT_HISTORY_QUERY: &str = r"query VaultHistory($vault: String!, $first: Int!, $skip: Int!) {
  vaultHistories(
    where: { vault: $vault }
    first: $first
    skip: $skip
    orderBy: timestamp
    orderDirection: desc
  ) {
    timestamp
    sharePrice
    priceUnderlying
    tvl
    apy
  }
}
";

const USER_BALANCE_HISTORY_QUERY: &str = r"query UserBalanceHistory($vault: String!, $account: String!, $first: Int!, $skip: Int!) {
  userBalanceHistories(
    where: { vault: $vault, account: $account }
    first: $first
    skip: $skip
    orderBy: timestamp
    orderDirection: desc
  ) {
    timestamp
    value
    tx
    action
  }
}
";

/// Query for a vault's share-price snapshots.
pub struct VaultHistory;

pub mod vault_history {
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
        pub vault_histories: Vec<VaultHistoryRow>,
    }

    /// One subgraph row. Every field may be missing or null upstream.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VaultHistoryRow {
        #[serde(default)]
        pub timestamp: Option<RawAmount>,
        #[serde(default)]
        pub share_price: Option<RawAmount>,
        #[serde(default)]
        pub price_underlying: Option<RawAmount>,
        #[serde(default)]
        pub tvl: Option<RawAmount>,
        #[serde(default)]
        pub apy: Option<RawAmount>,
    }
}

impl GraphQLQuery for VaultHistory {
    type Variables = vault_history::Variables;
    type ResponseData = vault_history::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: VAULT_HISTORY_QUERY,
            operation_name: "VaultHistory",
        }
    }
}

impl PagedQuery for VaultHistory {
    type Item = vault_history::VaultHistoryRow;

    fn with_page(variables: &Self::Variables, first: i64, skip: i64) -> Self::Variables {
        vault_history::Variables {
            first,
            skip,
            ..variables.clone()
        }
    }

    fn into_items(data: Self::ResponseData) -> Vec<Self::Item> {
        data.vault_histories
    }
}

/// Query for one account's balance changes in a vault.
pub struct UserBalanceHistory;

pub mod user_balance_history {
    use super::{Deserialize, RawAmount, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub vault: String,
        pub account: String,
        pub first: i64,
        pub skip: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub user_balance_histories: Vec<UserBalanceRow>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct UserBalanceRow {
        #[serde(default)]
        pub timestamp: Option<RawAmount>,
        #[serde(default)]
        pub value: Option<RawAmount>,
        #[serde(default)]
        pub tx: Option<String>,
        #[serde(default)]
        pub action: Option<String>,
    }
}

impl GraphQLQuery for UserBalanceHistory {
    type Variables = user_balance_history::Variables;
    type ResponseData = user_balance_history::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: USER_BALANCE_HISTORY_QUERY,
            operation_name: "UserBalanceHistory",
        }
    }
}

impl PagedQuery for UserBalanceHistory {
    type Item = user_balance_history::UserBalanceRow;

    fn with_page(variables: &Self::Variables, first: i64, skip: i64) -> Self::Variables {
        user_balance_history::Variables {
            first,
            skip,
            ..variables.clone()
        }
    }

    fn into_items(data: Self::ResponseData) -> Vec<Self::Item> {
        data.user_balance_histories
    }
}
