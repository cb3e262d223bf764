//! Dimensional rollups: per-product and per-counterparty totals, and the
//! top-N counterparty volume table.

use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashMap},
};

use serde::{Deserialize, Serialize};

use crate::{Currency, Money, Movement, Product, ProductId, aggregate::Totals};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Product,
    Counterparty,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "dimension", rename_all = "snake_case")]
pub enum DimensionKey {
    Product { id: ProductId, name: String },
    Counterparty { name: String },
}

impl DimensionKey {
    pub fn name(&self) -> &str {
        match self {
            Self::Product { name, .. } | Self::Counterparty { name } => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DimensionRollup {
    pub key: DimensionKey,
    pub currency: Currency,
    pub operations: u64,
    pub inflow_total: Money,
    pub outflow_total: Money,
    /// `inflow_total / operations`; `None` when there are no operations.
    pub average_inflow: Option<Money>,
    /// Mean movement amount regardless of direction.
    pub average_amount: Option<Money>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CounterpartyVolume {
    pub counterparty: String,
    pub operations: u64,
    pub volume_total: Money,
    pub average_amount: Option<Money>,
}

/// Groups movements by `(dimension key, currency)`.
///
/// For [`Dimension::Product`] this is an inner join: movements whose product
/// is absent or not in `products` are dropped. For
/// [`Dimension::Counterparty`] movements without a counterparty are dropped.
///
/// Rows are ordered by descending inflow total; ties fall back to key, then
/// currency.
pub fn rollup(
    movements: &[Movement],
    products: &BTreeMap<ProductId, Product>,
    dimension: Dimension,
) -> Vec<DimensionRollup> {
    let mut groups: BTreeMap<(DimensionKey, Currency), Totals> = BTreeMap::new();

    for movement in movements {
        let key = match dimension {
            Dimension::Product => {
                let Some(product) = movement.product_id.and_then(|id| products.get(&id)) else {
                    continue;
                };
                DimensionKey::Product {
                    id: product.id,
                    name: product.name.clone(),
                }
            }
            Dimension::Counterparty => {
                let Some(name) = &movement.counterparty else {
                    continue;
                };
                DimensionKey::Counterparty { name: name.clone() }
            }
        };
        groups
            .entry((key, movement.currency))
            .or_default()
            .record(movement);
    }

    let mut rows: Vec<DimensionRollup> = groups
        .into_iter()
        .map(|((key, currency), totals)| DimensionRollup {
            key,
            currency,
            operations: totals.operations,
            inflow_total: totals.inflow,
            outflow_total: totals.outflow,
            average_inflow: totals.inflow.average_over(totals.operations),
            average_amount: (totals.inflow + totals.outflow).average_over(totals.operations),
        })
        .collect();
    rows.sort_by_key(|row| Reverse(row.inflow_total));
    rows
}

/// Returns the `limit` counterparties with the largest traded volume.
///
/// Volume is the sum of amounts in both directions. With `currency` set only
/// that currency is counted; with `None` every currency is summed together.
/// Equal volumes keep the order in which the counterparties first appear in
/// `movements`.
pub fn top_counterparties(
    movements: &[Movement],
    limit: usize,
    currency: Option<Currency>,
) -> Vec<CounterpartyVolume> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<CounterpartyVolume> = Vec::new();

    for movement in movements {
        if currency.is_some_and(|c| c != movement.currency) {
            continue;
        }
        let Some(name) = movement.counterparty.as_deref() else {
            continue;
        };
        let slot = *index.entry(name).or_insert_with(|| {
            rows.push(CounterpartyVolume {
                counterparty: name.to_string(),
                operations: 0,
                volume_total: Money::ZERO,
                average_amount: None,
            });
            rows.len() - 1
        });
        let row = &mut rows[slot];
        row.operations += 1;
        row.volume_total += movement.amount;
    }

    for row in &mut rows {
        row.average_amount = row.volume_total.average_over(row.operations);
    }
    rows.sort_by_key(|row| Reverse(row.volume_total));
    rows.truncate(limit);
    rows
}
