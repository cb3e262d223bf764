//! Liquidity aggregation over a treasury ledger.
//!
//! A [`Ledger`] is a validated, read-only snapshot of cash [`Movement`]s and
//! the [`Product`] dimension. Every view is recomputed from the movements on
//! each call:
//!
//! - [`Ledger::aggregate`]: net flow per period (day, ISO week, month) and
//!   currency, optionally split by product or counterparty.
//! - [`Ledger::running_position`]: cumulative balance per currency.
//! - [`Ledger::alerts`]: days whose net flow falls below a threshold.
//! - [`Ledger::rollup`] and [`Ledger::top_counterparties`]: dimensional
//!   totals.
//! - [`Ledger::report`]: the tables consumed by the exporters.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ledger::{Currency, Ledger, Money, Movement, OperationType};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let ledger = Ledger::builder()
//!     .movement(Movement::new(1, day, OperationType::Inflow, Money::new(100_00), Currency::Pen).unwrap())
//!     .movement(Movement::new(2, day, OperationType::Outflow, Money::new(150_00), Currency::Pen).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let alerts = ledger.alerts(Currency::Pen, Money::ZERO);
//! assert_eq!(alerts[0].net_flow, Money::new(-50_00));
//! ```
use std::collections::{BTreeMap, HashSet};

pub use aggregate::{GroupBy, PeriodBucket};
pub use alerts::{Alert, DailyStatus, DayStatus};
pub use currency::Currency;
pub use error::LedgerError;
pub use liquidity::RunningPosition;
pub use money::Money;
pub use movement::{Movement, OperationType, Product, ProductId};
pub use period::Granularity;
pub use report::{CurrencyTotals, Report, ReportSettings, Summary};
pub use rollup::{CounterpartyVolume, Dimension, DimensionKey, DimensionRollup};

mod aggregate;
mod alerts;
mod currency;
mod error;
mod liquidity;
mod money;
mod movement;
mod period;
mod report;
mod rollup;

pub type ResultLedger<T> = Result<T, LedgerError>;

#[derive(Clone, Debug, Default)]
pub struct Ledger {
    movements: Vec<Movement>,
    products: BTreeMap<ProductId, Product>,
}

impl Ledger {
    /// Return a builder for `Ledger`.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Movements in insertion order.
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn aggregate(&self, granularity: Granularity, group_by: GroupBy) -> Vec<PeriodBucket> {
        aggregate::aggregate(&self.movements, &self.products, granularity, group_by)
    }

    /// Net flow per day and currency.
    pub fn daily_flow(&self) -> Vec<PeriodBucket> {
        self.aggregate(Granularity::Day, GroupBy::CURRENCY)
    }

    /// Net flow per calendar month and currency.
    pub fn monthly_summary(&self) -> Vec<PeriodBucket> {
        self.aggregate(Granularity::Month, GroupBy::CURRENCY)
    }

    pub fn running_position(&self) -> Vec<RunningPosition> {
        liquidity::running_position(&self.daily_flow())
    }

    pub fn alerts(&self, currency: Currency, threshold: Money) -> Vec<Alert> {
        alerts::evaluate(&self.running_position(), currency, threshold)
    }

    pub fn day_status(&self, currency: Currency, threshold: Money) -> Vec<DailyStatus> {
        alerts::day_status(&self.running_position(), currency, threshold)
    }

    pub fn rollup(&self, dimension: Dimension) -> Vec<DimensionRollup> {
        rollup::rollup(&self.movements, &self.products, dimension)
    }

    pub fn top_counterparties(
        &self,
        limit: usize,
        currency: Option<Currency>,
    ) -> Vec<CounterpartyVolume> {
        rollup::top_counterparties(&self.movements, limit, currency)
    }

    /// Movements sorted by date; same-day movements keep insertion order.
    pub fn chronological_movements(&self) -> Vec<Movement> {
        let mut movements = self.movements.clone();
        movements.sort_by_key(|m| m.date);
        movements
    }

    /// Builds the report tables in one pass over the daily buckets.
    pub fn report(&self, settings: &ReportSettings) -> Report {
        let daily_flow = self.daily_flow();
        let cumulative_position = liquidity::running_position(&daily_flow);
        let alerts = alerts::evaluate(
            &cumulative_position,
            settings.alert_currency,
            settings.alert_threshold,
        );
        tracing::debug!(
            days = daily_flow.len(),
            alerts = alerts.len(),
            currency = %settings.alert_currency,
            "computed liquidity position"
        );

        let report = Report {
            alert_currency: settings.alert_currency,
            cumulative_position,
            product_rollup: self.rollup(Dimension::Product),
            top_counterparties: self
                .top_counterparties(settings.top_counterparties, settings.counterparty_currency),
            monthly_summary: self.monthly_summary(),
            alerts,
            daily_flow,
            movements: self.chronological_movements(),
        };
        tracing::debug!(
            products = report.product_rollup.len(),
            counterparties = report.top_counterparties.len(),
            months = report.monthly_summary.len(),
            "computed rollups"
        );
        report
    }
}

/// The builder for `Ledger`.
#[derive(Default)]
pub struct LedgerBuilder {
    movements: Vec<Movement>,
    products: Vec<Product>,
}

impl LedgerBuilder {
    pub fn movement(mut self, movement: Movement) -> LedgerBuilder {
        self.movements.push(movement);
        self
    }

    pub fn movements(mut self, movements: impl IntoIterator<Item = Movement>) -> LedgerBuilder {
        self.movements.extend(movements);
        self
    }

    pub fn product(mut self, product: Product) -> LedgerBuilder {
        self.products.push(product);
        self
    }

    pub fn products(mut self, products: impl IntoIterator<Item = Product>) -> LedgerBuilder {
        self.products.extend(products);
        self
    }

    /// Construct `Ledger`.
    ///
    /// Fails on an amount outside `0..=Money::MAX_AMOUNT`, an empty product
    /// name or a repeated movement/product id. Fails as well when the gross
    /// volume of all movements does not fit in [`Money`]: every total, net
    /// flow and balance is bounded by it. Movements referencing unknown
    /// products are accepted: they only drop out of product-grouped views.
    pub fn build(self) -> ResultLedger<Ledger> {
        let mut products = BTreeMap::new();
        for product in self.products {
            if product.name.trim().is_empty() {
                return Err(LedgerError::InvalidProduct(format!(
                    "product {} name must not be empty",
                    product.id
                )));
            }
            if products.contains_key(&product.id) {
                return Err(LedgerError::ExistingKey(format!("product {}", product.id)));
            }
            products.insert(product.id, product);
        }

        let mut seen = HashSet::with_capacity(self.movements.len());
        let mut volume = Money::ZERO;
        for movement in &self.movements {
            movement.validate()?;
            if !seen.insert(movement.id) {
                return Err(LedgerError::ExistingKey(format!("movement {}", movement.id)));
            }
            volume = volume.checked_add(movement.amount).ok_or_else(|| {
                LedgerError::InvalidAmount(format!(
                    "movement {}: gross volume of the ledger overflows",
                    movement.id
                ))
            })?;
        }

        tracing::debug!(
            movements = self.movements.len(),
            products = products.len(),
            "ledger built"
        );
        Ok(Ledger {
            movements: self.movements,
            products,
        })
    }
}
