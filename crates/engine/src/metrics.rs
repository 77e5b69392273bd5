//! Per-user earnings and yield metrics derived from the classified timeline.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::apy::{trailing_apy, DAYS_PER_YEAR};
use crate::events::{classify_timeline, EnrichedEvent, EventKind};
use crate::format::{format_date, format_duration, PLACEHOLDER};
use crate::merge::{merge_histories, vault_points_desc, VaultPoint};
use crate::normalize::round_to;
use crate::types::{UserBalanceRecord, VaultDecimals, VaultHistoryRecord};

/// Short APY window, in days.
pub const APY_WINDOW_SHORT: u32 = 7;
/// Long APY window, in days. Also drives the monthly forecast.
pub const APY_WINDOW_LONG: u32 = 30;

/// A deposit or withdrawal, as a positive amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEntry {
    pub timestamp: i64,
    /// Underlying units.
    pub amount: Decimal,
    pub amount_usd: Decimal,
    pub tx: Option<String>,
}

impl FlowEntry {
    fn from_event(event: &EnrichedEvent) -> Self {
        Self {
            timestamp: event.timestamp,
            amount: event.net_change.abs(),
            amount_usd: event.net_change_usd.abs(),
            tx: event.tx.clone(),
        }
    }
}

/// Everything the dashboard shows for one account in one vault.
///
/// Unavailable strings hold [`PLACEHOLDER`]; unavailable APYs are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Balance of the newest event, in underlying units.
    pub current_balance: Decimal,
    pub current_balance_usd: Decimal,
    /// Sum of harvest net changes.
    pub total_earnings: Decimal,
    pub total_earnings_usd: Decimal,
    /// Harvest earnings since the last deposit or withdrawal.
    pub latest_earnings: Decimal,
    pub latest_earnings_usd: Decimal,
    pub total_deposited: Decimal,
    pub total_withdrawn: Decimal,
    pub deposits: Vec<FlowEntry>,
    pub withdrawals: Vec<FlowEntry>,
    pub apy_7d: Option<Decimal>,
    pub apy_30d: Option<Decimal>,
    /// Projected earnings over the next 30 days at the 30-day APY.
    pub monthly_forecast: Decimal,
    pub harvest_count: usize,
    /// Average time between harvests.
    pub frequency: String,
    /// Time since the most recent harvest.
    pub latest_update: String,
    /// Date of the oldest vault history record.
    pub operating_since: String,
    /// Classified timeline, newest first.
    pub events: Vec<EnrichedEvent>,
    /// Set when the metrics could not be computed.
    pub error: Option<String>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            current_balance: Decimal::ZERO,
            current_balance_usd: Decimal::ZERO,
            total_earnings: Decimal::ZERO,
            total_earnings_usd: Decimal::ZERO,
            latest_earnings: Decimal::ZERO,
            latest_earnings_usd: Decimal::ZERO,
            total_deposited: Decimal::ZERO,
            total_withdrawn: Decimal::ZERO,
            deposits: Vec::new(),
            withdrawals: Vec::new(),
            apy_7d: None,
            apy_30d: None,
            monthly_forecast: Decimal::ZERO,
            harvest_count: 0,
            frequency: PLACEHOLDER.to_string(),
            latest_update: PLACEHOLDER.to_string(),
            operating_since: PLACEHOLDER.to_string(),
            events: Vec::new(),
            error: None,
        }
    }
}

impl Metrics {
    /// Zeroed metrics carrying an error message, for a degraded view.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Whether these metrics stand in for a failed computation.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Run the full pipeline: merge, classify, aggregate.
///
/// `now` is only used for [`Metrics::latest_update`]; everything else is a
/// pure function of the inputs.
pub fn compute_metrics(
    vault_history: &[VaultHistoryRecord],
    user_history: &[UserBalanceRecord],
    decimals: VaultDecimals,
    now: i64,
) -> Metrics {
    let timeline = merge_histories(vault_history, user_history, decimals);
    let events = classify_timeline(&timeline);
    let vault_points = vault_points_desc(vault_history, decimals);

    let metrics = summarize(events, &vault_points, now);
    tracing::debug!(
        events = metrics.events.len(),
        harvests = metrics.harvest_count,
        current_balance = %metrics.current_balance,
        "computed vault metrics"
    );
    metrics
}

/// Aggregate classified events.
///
/// `vault_points` is the decoded vault history, newest first, duplicates
/// kept; it feeds the APY windows and the operating-since date.
pub fn summarize(events: Vec<EnrichedEvent>, vault_points: &[VaultPoint], now: i64) -> Metrics {
    let harvests: Vec<&EnrichedEvent> = events
        .iter()
        .filter(|e| e.event == EventKind::Harvest)
        .collect();

    let total_earnings = harvests.iter().map(|e| e.net_change).sum();
    let total_earnings_usd = harvests.iter().map(|e| e.net_change_usd).sum();

    let streak = events.iter().take_while(|e| e.event == EventKind::Harvest);
    let (latest_earnings, latest_earnings_usd) = streak.fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(amount, usd), e| (amount + e.net_change, usd + e.net_change_usd),
    );

    let deposits: Vec<FlowEntry> = events
        .iter()
        .filter(|e| e.event == EventKind::Convert && e.net_change > Decimal::ZERO)
        .map(FlowEntry::from_event)
        .collect();
    let withdrawals: Vec<FlowEntry> = events
        .iter()
        .filter(|e| e.event == EventKind::Revert && e.net_change < Decimal::ZERO)
        .map(FlowEntry::from_event)
        .collect();

    let (current_balance, current_balance_usd) = events
        .first()
        .map_or((Decimal::ZERO, Decimal::ZERO), |e| (e.balance, e.balance_usd));

    let apy_7d = trailing_apy(vault_points, APY_WINDOW_SHORT);
    let apy_30d = trailing_apy(vault_points, APY_WINDOW_LONG);
    let monthly_forecast = apy_30d.map_or(Decimal::ZERO, |apy| {
        monthly_forecast(current_balance, apy)
    });

    let frequency = match (harvests.first(), harvests.last()) {
        (Some(newest), Some(oldest)) if harvests.len() >= 2 => {
            let intervals = (harvests.len() - 1) as i64;
            format_duration((newest.timestamp - oldest.timestamp) / intervals)
        }
        _ => PLACEHOLDER.to_string(),
    };
    let latest_update = harvests.first().map_or_else(
        || PLACEHOLDER.to_string(),
        |newest| format_duration(now - newest.timestamp),
    );
    let operating_since = vault_points
        .iter()
        .map(|p| p.timestamp)
        .min()
        .map_or_else(|| PLACEHOLDER.to_string(), format_date);

    Metrics {
        current_balance,
        current_balance_usd,
        total_earnings,
        total_earnings_usd,
        latest_earnings,
        latest_earnings_usd,
        total_deposited: deposits.iter().map(|d| d.amount).sum(),
        total_withdrawn: withdrawals.iter().map(|w| w.amount).sum(),
        deposits,
        withdrawals,
        apy_7d,
        apy_30d,
        monthly_forecast,
        harvest_count: harvests.len(),
        frequency,
        latest_update,
        operating_since,
        events,
        error: None,
    }
}

/// `balance * ((1 + apy/100)^(30/365) - 1)`, zero if the power overflows.
pub fn monthly_forecast(balance: Decimal, apy_percent: Decimal) -> Decimal {
    if apy_percent.is_zero() {
        return Decimal::ZERO;
    }
    let growth = Decimal::ONE + apy_percent / Decimal::ONE_HUNDRED;
    let exponent = Decimal::from(30) / Decimal::from(DAYS_PER_YEAR);

    growth
        .checked_powd(exponent)
        .map_or(Decimal::ZERO, |factor| round_to(balance * (factor - Decimal::ONE), 18))
}
