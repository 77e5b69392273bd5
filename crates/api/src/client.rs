//! Subgraph client for Autopilot vault history and allocation data.

use std::time::Duration;

use autopilot_rs_engine::{
    AllocationPoint, AllocationSnapshot, UserBalanceRecord, VaultHistoryRecord,
};
use graphql_client::{GraphQLQuery, QueryBody, Response};
use reqwest::Client;
use url::Url;

use crate::error::{ApiError, Result};
use crate::queries::allocation::{allocation_points, allocation_snapshots};
use crate::queries::history::{user_balance_history, vault_history};
use crate::queries::{
    AllocationPoints, AllocationSnapshots, PagedQuery, UserBalanceHistory, VaultHistory,
};
use crate::types::{
    convert_allocation_point, convert_allocation_snapshot, convert_user_balance_row,
    convert_vault_history_row, normalize_address,
};

/// Default subgraph endpoint (a local graph-node).
pub const DEFAULT_API_URL: &str = "http://localhost:8000/subgraphs/name/autopilot";

/// Default page size for paginated queries. Graph-node caps `first` at 1000.
pub const DEFAULT_PAGE_SIZE: i64 = 1000;

/// Default upper bound on pages fetched per query.
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry. Doubles on each further retry.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 250;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for the subgraph client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL API URL.
    pub api_url: Url,
    /// Rows requested per page.
    pub page_size: i64,
    /// Pages fetched before giving up on a query.
    pub max_pages: u32,
    /// Retries after the first attempt, for retryable errors only.
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    #[expect(clippy::expect_used, reason = "the default URL is a valid constant")]
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("Invalid default API URL"),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom API URL.
    pub fn with_api_url(mut self, url: Url) -> Self {
        self.api_url = url;
        self
    }

    /// Set a custom page size.
    pub fn with_page_size(mut self, size: i64) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Set the maximum number of pages per query.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = pages;
        self
    }

    /// Set the number of retries after the first attempt.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the delay before the first retry.
    pub fn with_retry_base_delay_ms(mut self, delay_ms: u64) -> Self {
        self.retry_base_delay_ms = delay_ms;
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Backoff before retry number `attempt + 1`: `base * 2^attempt`.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.retry_base_delay_ms.saturating_mul(factor))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Client for the Autopilot subgraph.
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    http_client: Client,
    config: ClientConfig,
}

impl Default for SubgraphClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SubgraphClient {
    /// Create a new client with default configuration.
    pub fn new() -> Self {
        Self {
            http_client: Client::new(),
            config: ClientConfig::default(),
        }
    }

    /// Create a new client with custom configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a GraphQL query, retrying transient failures with
    /// exponential backoff.
    async fn execute<Q: GraphQLQuery>(&self, variables: Q::Variables) -> Result<Q::ResponseData> {
        let request_body = Q::build_query(variables);
        let mut attempt = 0;

        loop {
            match self.execute_once::<Q>(&request_body, attempt).await {
                Ok(data) => return Ok(data),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.retry_delay(attempt);
                    tracing::warn!(
                        operation = request_body.operation_name,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "subgraph request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn execute_once<Q: GraphQLQuery>(
        &self,
        request_body: &QueryBody<Q::Variables>,
        attempt: u32,
    ) -> Result<Q::ResponseData> {
        let request = self
            .http_client
            .post(self.config.api_url.as_str())
            .json(request_body)
            .send();

        let response = tokio::time::timeout(self.config.request_timeout(), request)
            .await
            .map_err(|_| ApiError::Timeout {
                attempts: attempt + 1,
            })??
            .error_for_status()?;

        let response_body: Response<Q::ResponseData> = response.json().await?;

        if let Some(errors) = response_body.errors {
            if !errors.is_empty() {
                return Err(ApiError::GraphQL(
                    errors
                        .iter()
                        .map(|e| e.message.clone())
                        .collect::<Vec<_>>()
                        .join("; "),
                ));
            }
        }

        response_body
            .data
            .ok_or_else(|| ApiError::Parse("No data in response".to_string()))
    }

    /// Fetch every page of a query, stopping on a short page or at
    /// `max_pages`.
    async fn paginate<Q: PagedQuery>(&self, variables: Q::Variables) -> Result<Vec<Q::Item>> {
        let page_size = self.config.page_size;
        let mut items = Vec::new();

        for page in 0..self.config.max_pages {
            let skip = i64::from(page) * page_size;
            let data = self
                .execute::<Q>(Q::with_page(&variables, page_size, skip))
                .await?;
            let batch = Q::into_items(data);
            let rows = batch.len();
            items.extend(batch);

            tracing::debug!(page, rows, "fetched subgraph page");
            if (rows as i64) < page_size {
                return Ok(items);
            }
        }

        tracing::warn!(
            max_pages = self.config.max_pages,
            rows = items.len(),
            "stopped paginating at the page limit, history may be truncated"
        );
        Ok(items)
    }

    /// Get a vault's share-price history, newest first as served.
    pub async fn get_vault_history(&self, vault: &str) -> Result<Vec<VaultHistoryRecord>> {
        let variables = vault_history::Variables {
            vault: normalize_address(vault)?,
            first: self.config.page_size,
            skip: 0,
        };

        let rows = self.paginate::<VaultHistory>(variables).await?;
        Ok(keep_timestamped("vault history", rows, convert_vault_history_row))
    }

    /// Get one account's balance history in a vault.
    pub async fn get_user_balance_history(
        &self,
        vault: &str,
        account: &str,
    ) -> Result<Vec<UserBalanceRecord>> {
        let variables = user_balance_history::Variables {
            vault: normalize_address(vault)?,
            account: normalize_address(account)?,
            first: self.config.page_size,
            skip: 0,
        };

        let rows = self.paginate::<UserBalanceHistory>(variables).await?;
        Ok(keep_timestamped("user balance history", rows, convert_user_balance_row))
    }

    /// Get the markets a vault can allocate to.
    pub async fn get_allocation_points(&self, vault: &str) -> Result<Vec<AllocationPoint>> {
        let variables = allocation_points::Variables {
            vault: normalize_address(vault)?,
            first: self.config.page_size,
            skip: 0,
        };

        let rows = self.paginate::<AllocationPoints>(variables).await?;
        let total = rows.len();
        let points: Vec<AllocationPoint> =
            rows.into_iter().filter_map(convert_allocation_point).collect();
        if points.len() < total {
            tracing::debug!(
                dropped = total - points.len(),
                "skipped allocation points without id or address"
            );
        }
        Ok(points)
    }

    /// Get a vault's per-market balance snapshots.
    pub async fn get_allocation_snapshots(&self, vault: &str) -> Result<Vec<AllocationSnapshot>> {
        let variables = allocation_snapshots::Variables {
            vault: normalize_address(vault)?,
            first: self.config.page_size,
            skip: 0,
        };

        let rows = self.paginate::<AllocationSnapshots>(variables).await?;
        Ok(keep_timestamped(
            "allocation snapshots",
            rows,
            convert_allocation_snapshot,
        ))
    }
}

/// Convert rows, dropping (and reporting) those without a usable timestamp.
fn keep_timestamped<R, T>(stream: &str, rows: Vec<R>, convert: fn(R) -> Option<T>) -> Vec<T> {
    let total = rows.len();
    let records: Vec<T> = rows.into_iter().filter_map(convert).collect();
    if records.len() < total {
        tracing::warn!(
            stream,
            dropped = total - records.len(),
            "dropped rows without a parseable timestamp"
        );
    }
    records
}
