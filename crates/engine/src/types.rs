//! Raw record types consumed by the engines.
//!
//! Records are immutable snapshots of what the subgraph reported. Amounts are
//! kept in their raw fixed-point form and only decoded by the
//! [`normalize`](crate::normalize) module, so a malformed field never prevents
//! a record from being carried through the pipeline.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default scale of the user share-balance stream.
pub const DEFAULT_VALUE_DECIMALS: u32 = 8;

/// A raw amount as reported upstream: a fixed-point integer string, a decimal
/// string, or a JSON number.
///
/// Deserialization accepts strings and numbers alike and never fails on
/// content; decoding happens later and falls back to zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RawAmount(String);

impl RawAmount {
    /// Wrap a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RawAmount {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RawAmount {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<u64> for RawAmount {
    fn from(raw: u64) -> Self {
        Self(raw.to_string())
    }
}

impl From<i64> for RawAmount {
    fn from(raw: i64) -> Self {
        Self(raw.to_string())
    }
}

impl Serialize for RawAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct RawAmountVisitor;

impl Visitor<'_> for RawAmountVisitor {
    type Value = RawAmount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a numeric string or a number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(RawAmount::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(RawAmount(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(RawAmount(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(RawAmount(v.to_string()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        Ok(RawAmount(v.to_string()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
        Ok(RawAmount(v.to_string()))
    }

    // f64's Display never switches to exponent notation.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(RawAmount(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for RawAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawAmountVisitor)
    }
}

/// One observed snapshot of a vault's share price and TVL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultHistoryRecord {
    /// Unix seconds. Not unique across records.
    pub timestamp: i64,
    /// Underlying per share, scaled by the share decimals.
    pub share_price: RawAmount,
    /// Quote price of one underlying unit, scaled by the underlying decimals.
    pub price_underlying: RawAmount,
    /// Display-only pass-through.
    #[serde(default)]
    pub tvl: Option<RawAmount>,
    /// Display-only pass-through.
    #[serde(default)]
    pub apy: Option<RawAmount>,
}

impl VaultHistoryRecord {
    /// Create a record with no underlying price, TVL or APY.
    pub fn new(timestamp: i64, share_price: impl Into<RawAmount>) -> Self {
        Self {
            timestamp,
            share_price: share_price.into(),
            price_underlying: RawAmount::default(),
            tvl: None,
            apy: None,
        }
    }

    /// Set the underlying price.
    pub fn with_price_underlying(mut self, price: impl Into<RawAmount>) -> Self {
        self.price_underlying = price.into();
        self
    }

    /// Set the pass-through TVL.
    pub fn with_tvl(mut self, tvl: impl Into<RawAmount>) -> Self {
        self.tvl = Some(tvl.into());
        self
    }

    /// Set the pass-through APY.
    pub fn with_apy(mut self, apy: impl Into<RawAmount>) -> Self {
        self.apy = Some(apy.into());
        self
    }
}

/// One observed change of a user's share balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBalanceRecord {
    /// Unix seconds.
    pub timestamp: i64,
    /// Share balance after the change, scaled by the value decimals.
    pub value: RawAmount,
    /// Transaction hash, used only as a dedup key component.
    #[serde(default)]
    pub tx: Option<String>,
    /// Action label as reported upstream, if any.
    #[serde(default)]
    pub action: Option<UserAction>,
}

impl UserBalanceRecord {
    /// Create a record without a transaction hash or action label.
    pub fn new(timestamp: i64, value: impl Into<RawAmount>) -> Self {
        Self {
            timestamp,
            value: value.into(),
            tx: None,
            action: None,
        }
    }

    /// Set the transaction hash.
    pub fn with_tx(mut self, tx: impl Into<String>) -> Self {
        self.tx = Some(tx.into());
        self
    }

    /// Set the upstream action label.
    pub fn with_action(mut self, label: &str) -> Self {
        self.action = Some(UserAction::from_label(label));
        self
    }
}

/// The action a subgraph attached to a balance change.
///
/// Labels are free-form upstream, so anything unrecognised stays
/// [`UserAction::Unknown`] with the original text. Event classification never
/// reads this; it is informational.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserAction {
    Deposit,
    Withdrawal,
    Unknown(String),
}

impl UserAction {
    /// Parse an upstream label.
    ///
    /// Exact tokens are matched first. Otherwise a substring heuristic is used
    /// as a fallback (`"vaultDeposit"` reads as a deposit).
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_ascii_lowercase();
        match lower.as_str() {
            "deposit" | "mint" | "convert" => return Self::Deposit,
            "withdraw" | "withdrawal" | "redeem" | "revert" => return Self::Withdrawal,
            _ => {}
        }

        if lower.contains("deposit") || lower.contains("mint") {
            Self::Deposit
        } else if lower.contains("withdraw") || lower.contains("redeem") || lower.contains("burn")
        {
            Self::Withdrawal
        } else {
            Self::Unknown(label.to_string())
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Unknown(label) => label,
        }
    }
}

impl From<String> for UserAction {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<UserAction> for String {
    fn from(action: UserAction) -> Self {
        action.label().to_string()
    }
}

/// Decimal scales of the three amount streams of a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultDecimals {
    /// Scale of `sharePrice` in the vault history.
    pub share_decimals: u32,
    /// Scale of `priceUnderlying` in the vault history.
    pub underlying_decimals: u32,
    /// Scale of `value` in the user balance history.
    pub value_decimals: u32,
}

impl VaultDecimals {
    /// Create a descriptor with the default value scale.
    pub fn new(share_decimals: u32, underlying_decimals: u32) -> Self {
        Self {
            share_decimals,
            underlying_decimals,
            value_decimals: DEFAULT_VALUE_DECIMALS,
        }
    }

    /// Override the user value scale.
    pub fn with_value_decimals(mut self, value_decimals: u32) -> Self {
        self.value_decimals = value_decimals;
        self
    }
}

impl Default for VaultDecimals {
    fn default() -> Self {
        Self::new(18, 18)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_amount_accepts_strings_and_numbers() {
        let record: VaultHistoryRecord = serde_json::from_str(
            r#"{"timestamp":100,"sharePrice":"1000000","priceUnderlying":1.5,"tvl":250000}"#,
        )
        .unwrap();

        assert_eq!(record.share_price.as_str(), "1000000");
        assert_eq!(record.price_underlying.as_str(), "1.5");
        assert_eq!(record.tvl, Some(RawAmount::from("250000")));
        assert_eq!(record.apy, None);
    }

    #[test]
    fn test_user_action_exact_tokens() {
        assert_eq!(UserAction::from_label("Deposit"), UserAction::Deposit);
        assert_eq!(UserAction::from_label("redeem"), UserAction::Withdrawal);
    }

    #[test]
    fn test_user_action_substring_fallback() {
        assert_eq!(UserAction::from_label("vaultDeposit"), UserAction::Deposit);
        assert_eq!(UserAction::from_label("sharesBurned"), UserAction::Withdrawal);
        assert_eq!(
            UserAction::from_label("transfer"),
            UserAction::Unknown("transfer".to_string())
        );
    }

    #[test]
    fn test_user_action_serde_round_trips_through_label() {
        let record: UserBalanceRecord =
            serde_json::from_str(r#"{"timestamp":1,"value":"5","action":"Withdraw"}"#).unwrap();
        assert_eq!(record.action, Some(UserAction::Withdrawal));

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""action":"withdrawal""#));
    }

    #[test]
    fn test_vault_decimals_default_value_scale() {
        let decimals = VaultDecimals::new(6, 18);
        assert_eq!(decimals.value_decimals, DEFAULT_VALUE_DECIMALS);
        assert_eq!(decimals.with_value_decimals(6).value_decimals, 6);
    }
}
