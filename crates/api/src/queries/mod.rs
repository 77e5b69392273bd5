//! GraphQL query definitions for the Autopilot subgraph.
//!
//! The subgraph schema is small and stable, so the request and response types
//! are written by hand and implement [`GraphQLQuery`] directly instead of
//! going through the derive.

use graphql_client::GraphQLQuery;

pub mod allocation;
pub mod history;

pub use allocation::{AllocationPoints, AllocationSnapshots};
pub use history::{UserBalanceHistory, VaultHistory};

/// A query that is fetched one `first`/`skip` page at a time.
pub trait PagedQuery: GraphQLQuery {
    /// Row type of one page.
    type Item;

    /// Copy of `variables` pointing at the given page.
    fn with_page(variables: &Self::Variables, first: i64, skip: i64) -> Self::Variables;

    /// Rows of one page response.
    fn into_items(data: Self::ResponseData) -> Vec<Self::Item>;
}
