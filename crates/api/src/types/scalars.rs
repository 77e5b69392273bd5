//! Subgraph scalar parsing.

use std::str::FromStr;

use alloy_primitives::Address;
use autopilot_rs_engine::RawAmount;

use crate::error::{ApiError, Result};

/// Validate a 20-byte hex address and return it in the lower-case form the
/// subgraph indexes by.
pub fn normalize_address(raw: &str) -> Result<String> {
    let address = Address::from_str(raw.trim())
        .map_err(|_| ApiError::InvalidAddress(raw.to_string()))?;
    Ok(format!("{address:#x}"))
}

/// Parse a subgraph timestamp (BigInt string or number) into unix seconds.
pub fn parse_timestamp(raw: Option<&RawAmount>) -> Option<i64> {
    raw.and_then(|r| r.as_str().trim().parse::<i64>().ok())
}
