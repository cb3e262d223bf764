//! Liquidity alerts.
//!
//! A day raises an alert when its net flow is strictly below the threshold.
//! Every qualifying day yields exactly one alert; nothing is suppressed or
//! merged with its neighbours.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{Currency, Money, RunningPosition};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub period: NaiveDate,
    pub currency: Currency,
    pub net_flow: Money,
    pub cumulative_balance: Money,
    /// How far the net flow fell below the threshold. Always positive.
    pub shortfall: Money,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Ok,
    NegativeFlow,
}

impl DayStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NegativeFlow => "ALERT: negative flow",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DailyStatus {
    pub period: NaiveDate,
    pub net_flow: Money,
    pub status: DayStatus,
}

/// Returns the alerts of `currency`, most negative net flow first.
///
/// Days with equal net flow keep chronological order.
pub fn evaluate(positions: &[RunningPosition], currency: Currency, threshold: Money) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = chronological(positions, currency)
        .into_iter()
        .filter(|p| p.net_flow < threshold)
        .map(|p| Alert {
            period: p.period,
            currency: p.currency,
            net_flow: p.net_flow,
            cumulative_balance: p.cumulative_balance,
            shortfall: threshold.saturating_sub(p.net_flow),
        })
        .collect();
    alerts.sort_by_key(|a| a.net_flow);
    alerts
}

/// Labels every day of `currency`, in chronological order.
pub fn day_status(
    positions: &[RunningPosition],
    currency: Currency,
    threshold: Money,
) -> Vec<DailyStatus> {
    chronological(positions, currency)
        .into_iter()
        .map(|p| DailyStatus {
            period: p.period,
            net_flow: p.net_flow,
            status: if p.net_flow < threshold {
                DayStatus::NegativeFlow
            } else {
                DayStatus::Ok
            },
        })
        .collect()
}

fn chronological(positions: &[RunningPosition], currency: Currency) -> Vec<&RunningPosition> {
    let mut rows: Vec<&RunningPosition> =
        positions.iter().filter(|p| p.currency == currency).collect();
    rows.sort_by_key(|p| p.period);
    rows
}
