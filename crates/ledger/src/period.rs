//! Period truncation.
//!
//! Week buckets start on the ISO Monday; month buckets start on the first
//! calendar day. The truncated date is the period key used by every table.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Returns the first day of the period containing `date`.
    #[must_use]
    pub fn truncate(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => {
                let offset = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(offset)).unwrap_or(date)
            }
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Human label of a period key: `2024-03-04`, `2024-W10` or `2024-03`.
    #[must_use]
    pub fn label(self, period: NaiveDate) -> String {
        match self {
            Self::Day => period.format("%Y-%m-%d").to_string(),
            Self::Week => {
                let week = period.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Self::Month => period.format("%Y-%m").to_string(),
        }
    }
}
