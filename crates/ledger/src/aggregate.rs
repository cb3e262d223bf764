//! Period aggregation.
//!
//! Groups movements by `(period, currency)` and, optionally, by product and
//! counterparty, accumulating inflow and outflow totals separately. Net flow
//! is always derived as `inflow_total - outflow_total`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{Currency, Granularity, Money, Movement, OperationType, Product, ProductId};

/// Extra grouping keys on top of `(period, currency)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupBy {
    /// Group by product. Movements without a known product are dropped.
    pub product: bool,
    /// Group by counterparty. Movements without a counterparty are dropped.
    pub counterparty: bool,
}

impl GroupBy {
    /// Currency-only grouping.
    pub const CURRENCY: GroupBy = GroupBy {
        product: false,
        counterparty: false,
    };
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PeriodBucket {
    pub period: NaiveDate,
    pub currency: Currency,
    pub product_id: Option<ProductId>,
    pub counterparty: Option<String>,
    pub inflow_total: Money,
    pub outflow_total: Money,
    pub operations: u64,
}

impl PeriodBucket {
    #[must_use]
    pub fn net_flow(&self) -> Money {
        self.inflow_total - self.outflow_total
    }
}

/// Running inflow/outflow totals of a group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Totals {
    pub inflow: Money,
    pub outflow: Money,
    pub operations: u64,
}

impl Totals {
    pub fn record(&mut self, movement: &Movement) {
        match movement.operation {
            OperationType::Inflow => self.inflow += movement.amount,
            OperationType::Outflow => self.outflow += movement.amount,
        }
        self.operations += 1;
    }
}

type BucketKey = (NaiveDate, Currency, Option<ProductId>, Option<String>);

/// Aggregates `movements` into period buckets.
///
/// The result is ordered by period, then currency, then product id, then
/// counterparty. `products` is only consulted when grouping by product: a
/// movement whose product is absent or unknown is left out of that view.
pub fn aggregate(
    movements: &[Movement],
    products: &BTreeMap<ProductId, Product>,
    granularity: Granularity,
    group_by: GroupBy,
) -> Vec<PeriodBucket> {
    let mut buckets: BTreeMap<BucketKey, Totals> = BTreeMap::new();

    for movement in movements {
        let product_id = if group_by.product {
            match movement.product_id.filter(|id| products.contains_key(id)) {
                Some(id) => Some(id),
                None => continue,
            }
        } else {
            None
        };
        let counterparty = if group_by.counterparty {
            match &movement.counterparty {
                Some(name) => Some(name.clone()),
                None => continue,
            }
        } else {
            None
        };

        let key = (
            granularity.truncate(movement.date),
            movement.currency,
            product_id,
            counterparty,
        );
        buckets.entry(key).or_default().record(movement);
    }

    buckets
        .into_iter()
        .map(
            |((period, currency, product_id, counterparty), totals)| PeriodBucket {
                period,
                currency,
                product_id,
                counterparty,
                inflow_total: totals.inflow,
                outflow_total: totals.outflow,
                operations: totals.operations,
            },
        )
        .collect()
}
