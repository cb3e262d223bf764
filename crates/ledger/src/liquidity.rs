//! Running liquidity position.
//!
//! The cumulative balance of a currency is the prefix sum of its daily net
//! flow. Each currency is scanned on its own; a balance never carries into
//! another currency.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{Currency, Money, PeriodBucket};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunningPosition {
    pub period: NaiveDate,
    pub currency: Currency,
    pub net_flow: Money,
    pub cumulative_balance: Money,
}

/// Computes the running position from day buckets.
///
/// Buckets sharing `(period, currency)` (e.g. a product-grouped input) are
/// merged first, so the output holds exactly one row per pair. Rows are
/// ordered by period, then currency; within a currency they are strictly
/// ascending. Negative balances are kept as-is.
pub fn running_position(buckets: &[PeriodBucket]) -> Vec<RunningPosition> {
    let mut partitions: BTreeMap<Currency, BTreeMap<NaiveDate, Money>> = BTreeMap::new();
    for bucket in buckets {
        *partitions
            .entry(bucket.currency)
            .or_default()
            .entry(bucket.period)
            .or_default() += bucket.net_flow();
    }

    let mut positions: Vec<RunningPosition> = partitions
        .into_iter()
        .flat_map(|(currency, flows)| prefix_sum(currency, flows))
        .collect();
    positions.sort_by_key(|p| (p.period, p.currency));
    positions
}

fn prefix_sum(currency: Currency, flows: BTreeMap<NaiveDate, Money>) -> Vec<RunningPosition> {
    let mut balance = Money::ZERO;
    flows
        .into_iter()
        .map(|(period, net_flow)| {
            balance += net_flow;
            RunningPosition {
                period,
                currency,
                net_flow,
                cumulative_balance: balance,
            }
        })
        .collect()
}
