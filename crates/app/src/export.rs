//! Writes the report tables as CSV files, one per sheet.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use ledger::{
    Alert, CounterpartyVolume, Currency, DimensionRollup, Granularity, Money, Movement,
    PeriodBucket, Report, RunningPosition,
};
use serde::Serialize;

use crate::error::Result;

const NO_ALERTS: &str = "No alerts in the period";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sheet {
    DailyFlow,
    MonthlySummary,
    ProductRollup,
    TopCounterparties,
    Alerts,
    CumulativePosition,
    Movements,
}

impl Sheet {
    pub const ALL: [Sheet; 7] = [
        Sheet::DailyFlow,
        Sheet::MonthlySummary,
        Sheet::ProductRollup,
        Sheet::TopCounterparties,
        Sheet::Alerts,
        Sheet::CumulativePosition,
        Sheet::Movements,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::DailyFlow => "daily_flow.csv",
            Self::MonthlySummary => "monthly_summary.csv",
            Self::ProductRollup => "product_rollup.csv",
            Self::TopCounterparties => "top_counterparties.csv",
            Self::Alerts => "alerts.csv",
            Self::CumulativePosition => "cumulative_position.csv",
            Self::Movements => "movements.csv",
        }
    }
}

#[derive(Serialize)]
struct FlowRow {
    period: String,
    currency: Currency,
    inflow_total: Money,
    outflow_total: Money,
    net_flow: Money,
    operations: u64,
}

impl FlowRow {
    fn new(bucket: &PeriodBucket, granularity: Granularity) -> Self {
        Self {
            period: granularity.label(bucket.period),
            currency: bucket.currency,
            inflow_total: bucket.inflow_total,
            outflow_total: bucket.outflow_total,
            net_flow: bucket.net_flow(),
            operations: bucket.operations,
        }
    }
}

#[derive(Serialize)]
struct PositionRow {
    date: NaiveDate,
    currency: Currency,
    net_flow: Money,
    cumulative_balance: Money,
}

#[derive(Serialize)]
struct RollupRow<'a> {
    key: &'a str,
    currency: Currency,
    operations: u64,
    inflow_total: Money,
    outflow_total: Money,
    average_inflow: Option<Money>,
    average_amount: Option<Money>,
}

#[derive(Serialize)]
struct AlertRow {
    date: NaiveDate,
    currency: Currency,
    net_flow: Money,
    cumulative_balance: Money,
    shortfall: Money,
    status: &'static str,
}

#[derive(Serialize)]
struct MovementRow<'a> {
    id: u64,
    date: NaiveDate,
    product_id: Option<u32>,
    operation: &'static str,
    amount: Money,
    currency: Currency,
    counterparty: Option<&'a str>,
    description: Option<&'a str>,
}

impl<'a> From<&'a Movement> for MovementRow<'a> {
    fn from(movement: &'a Movement) -> Self {
        Self {
            id: movement.id,
            date: movement.date,
            product_id: movement.product_id.map(|id| id.0),
            operation: movement.operation.as_str(),
            amount: movement.amount,
            currency: movement.currency,
            counterparty: movement.counterparty.as_deref(),
            description: movement.description.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct MessageRow {
    message: &'static str,
}

/// Writes every sheet of `report` into `dir`, creating it if needed.
pub fn write_report(dir: &Path, report: &Report) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(Sheet::ALL.len());
    for sheet in Sheet::ALL {
        let path = dir.join(sheet.file_name());
        write_sheet(File::create(&path)?, sheet, report)?;
        tracing::debug!(path = %path.display(), "sheet written");
        written.push(path);
    }
    tracing::info!(dir = %dir.display(), sheets = written.len(), "report exported");
    Ok(written)
}

pub fn write_sheet<W: io::Write>(writer: W, sheet: Sheet, report: &Report) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    match sheet {
        Sheet::DailyFlow => write_flows(&mut writer, &report.daily_flow, Granularity::Day)?,
        Sheet::MonthlySummary => {
            write_flows(&mut writer, &report.monthly_summary, Granularity::Month)?
        }
        Sheet::ProductRollup => write_rollups(&mut writer, &report.product_rollup)?,
        Sheet::TopCounterparties => write_counterparties(&mut writer, &report.top_counterparties)?,
        Sheet::Alerts => write_alerts(&mut writer, &report.alerts)?,
        Sheet::CumulativePosition => {
            write_positions(&mut writer, &report.cumulative_position)?
        }
        Sheet::Movements => {
            for movement in &report.movements {
                writer.serialize(MovementRow::from(movement))?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_flows<W: io::Write>(
    writer: &mut csv::Writer<W>,
    buckets: &[PeriodBucket],
    granularity: Granularity,
) -> Result<()> {
    for bucket in buckets {
        writer.serialize(FlowRow::new(bucket, granularity))?;
    }
    Ok(())
}

fn write_positions<W: io::Write>(
    writer: &mut csv::Writer<W>,
    positions: &[RunningPosition],
) -> Result<()> {
    for position in positions {
        writer.serialize(PositionRow {
            date: position.period,
            currency: position.currency,
            net_flow: position.net_flow,
            cumulative_balance: position.cumulative_balance,
        })?;
    }
    Ok(())
}

fn write_rollups<W: io::Write>(
    writer: &mut csv::Writer<W>,
    rollups: &[DimensionRollup],
) -> Result<()> {
    for rollup in rollups {
        writer.serialize(RollupRow {
            key: rollup.key.name(),
            currency: rollup.currency,
            operations: rollup.operations,
            inflow_total: rollup.inflow_total,
            outflow_total: rollup.outflow_total,
            average_inflow: rollup.average_inflow,
            average_amount: rollup.average_amount,
        })?;
    }
    Ok(())
}

fn write_counterparties<W: io::Write>(
    writer: &mut csv::Writer<W>,
    rows: &[CounterpartyVolume],
) -> Result<()> {
    for row in rows {
        writer.serialize(row)?;
    }
    Ok(())
}

fn write_alerts<W: io::Write>(writer: &mut csv::Writer<W>, alerts: &[Alert]) -> Result<()> {
    if alerts.is_empty() {
        writer.serialize(MessageRow { message: NO_ALERTS })?;
        return Ok(());
    }
    for alert in alerts {
        writer.serialize(AlertRow {
            date: alert.period,
            currency: alert.currency,
            net_flow: alert.net_flow,
            cumulative_balance: alert.cumulative_balance,
            shortfall: alert.shortfall,
            status: ledger::DayStatus::NegativeFlow.label(),
        })?;
    }
    Ok(())
}
