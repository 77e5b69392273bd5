//! Autopilot Vault Analytics API Library
//!
//! This crate fetches Autopilot vault data from a GraphQL subgraph and runs
//! the `autopilot-rs-engine` computations over it.
//!
//! # Example
//!
//! ```no_run
//! use autopilot_rs_api::{ClientConfig, Dashboard, SubgraphClient, VaultDecimals};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), autopilot_rs_api::ApiError> {
//!     let config = ClientConfig::new()
//!         .with_api_url(Url::parse("http://localhost:8000/subgraphs/name/autopilot").unwrap())
//!         .with_max_retries(2);
//!     let dashboard = Dashboard::new(SubgraphClient::with_config(config));
//!
//!     let vault = "0x0000000000000000000000000000000000000001";
//!     let account = "0x0000000000000000000000000000000000000002";
//!
//!     // Fetch failures degrade to zeroed metrics with `error` set.
//!     let metrics = dashboard.metrics(vault, account, VaultDecimals::new(18, 6), 1_700_000_000).await;
//!     println!("earned {} over {} harvests", metrics.total_earnings, metrics.harvest_count);
//!
//!     let allocations = dashboard.allocations(vault, 6).await?;
//!     for entry in &allocations.current {
//!         println!("{}: {}%", entry.name, entry.percentage);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All errors are unified through [`ApiError`]. Use
//! [`ApiError::error_category()`] for high-level classification and
//! [`ApiError::is_retryable()`] to determine retry eligibility. The client
//! already retries retryable errors with exponential backoff.

pub mod client;
pub mod dashboard;
pub mod error;
pub mod queries;
pub mod source;
pub mod types;

// Re-export main types at crate root
pub use client::{
    ClientConfig, SubgraphClient, DEFAULT_API_URL, DEFAULT_MAX_PAGES, DEFAULT_MAX_RETRIES,
    DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_BASE_DELAY_MS,
};
pub use dashboard::{AllocationView, Dashboard};
pub use error::{ApiError, ErrorCategory, Result};
pub use source::HistorySource;
pub use types::normalize_address;

pub use autopilot_rs_engine as engine;
pub use autopilot_rs_engine::{
    AllocationPoint, AllocationSnapshot, Metrics, UserBalanceRecord, VaultDecimals,
    VaultHistoryRecord,
};
