//! The report tables and the executive summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    Alert, CounterpartyVolume, Currency, DimensionRollup, Money, Movement, PeriodBucket,
    RunningPosition,
};

/// Knobs of a report run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Currency whose daily flow is checked for alerts.
    pub alert_currency: Currency,
    /// A day alerts when its net flow is strictly below this value.
    pub alert_threshold: Money,
    /// Number of rows in the counterparty table.
    pub top_counterparties: usize,
    /// Restrict the counterparty table to one currency. `None` sums every
    /// currency together.
    pub counterparty_currency: Option<Currency>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            alert_currency: Currency::Pen,
            alert_threshold: Money::ZERO,
            top_counterparties: 10,
            counterparty_currency: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub alert_currency: Currency,
    pub daily_flow: Vec<PeriodBucket>,
    pub cumulative_position: Vec<RunningPosition>,
    pub product_rollup: Vec<DimensionRollup>,
    pub top_counterparties: Vec<CounterpartyVolume>,
    pub monthly_summary: Vec<PeriodBucket>,
    pub alerts: Vec<Alert>,
    /// The validated movements the tables were computed from, in date order.
    pub movements: Vec<Movement>,
}

impl Report {
    /// Headline figures of the report.
    pub fn summary(&self) -> Summary {
        let currencies = Currency::ALL
            .into_iter()
            .map(|currency| {
                let rows = self.daily_flow.iter().filter(|b| b.currency == currency);
                let (inflow_total, outflow_total) = rows.fold(
                    (Money::ZERO, Money::ZERO),
                    |(inflow, outflow), b| (inflow + b.inflow_total, outflow + b.outflow_total),
                );
                CurrencyTotals {
                    currency,
                    inflow_total,
                    outflow_total,
                    net_flow: inflow_total - outflow_total,
                }
            })
            .collect();

        let mut days: Vec<NaiveDate> = self.daily_flow.iter().map(|b| b.period).collect();
        days.dedup();

        Summary {
            first_date: days.first().copied(),
            last_date: days.last().copied(),
            operations: self.daily_flow.iter().map(|b| b.operations).sum(),
            operating_days: days.len(),
            currencies,
            alert_currency: self.alert_currency,
            alerts: self.alerts.len(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurrencyTotals {
    pub currency: Currency,
    pub inflow_total: Money,
    pub outflow_total: Money,
    pub net_flow: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub operations: u64,
    pub operating_days: usize,
    /// One row per supported currency, zero totals included.
    pub currencies: Vec<CurrencyTotals>,
    pub alert_currency: Currency,
    pub alerts: usize,
}

impl Summary {
    pub fn totals(&self, currency: Currency) -> Option<&CurrencyTotals> {
        self.currencies.iter().find(|t| t.currency == currency)
    }
}
