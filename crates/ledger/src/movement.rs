//! Movement and product records.
//!
//! A [`Movement`] is a single dated cash transaction. Its amount is always
//! stored as a non-negative [`Money`]; the direction lives in
//! [`OperationType`] and the sign is derived from it, never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Currency, LedgerError, Money, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Inflow,
    Outflow,
}

impl OperationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inflow => "inflow",
            Self::Outflow => "outflow",
        }
    }
}

impl TryFrom<&str> for OperationType {
    type Error = LedgerError;

    /// Accepts the canonical names and the ledger export's `ingreso` /
    /// `egreso`, ignoring case and surrounding blanks.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "inflow" | "ingreso" => Ok(Self::Inflow),
            "outflow" | "egreso" => Ok(Self::Outflow),
            other => Err(LedgerError::InvalidOperation(format!(
                "invalid operation type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product dimension row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
}

impl Product {
    pub fn new(id: ProductId, name: &str) -> ResultLedger<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::InvalidProduct(format!(
                "product {id} name must not be empty"
            )));
        }
        Ok(Self {
            id,
            name: trimmed.to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: u64,
    pub date: NaiveDate,
    pub product_id: Option<ProductId>,
    pub operation: OperationType,
    pub amount: Money,
    pub currency: Currency,
    pub counterparty: Option<String>,
    pub description: Option<String>,
}

impl Movement {
    pub fn new(
        id: u64,
        date: NaiveDate,
        operation: OperationType,
        amount: Money,
        currency: Currency,
    ) -> ResultLedger<Self> {
        let movement = Self {
            id,
            date,
            product_id: None,
            operation,
            amount,
            currency,
            counterparty: None,
            description: None,
        };
        movement.validate()?;
        Ok(movement)
    }

    #[must_use]
    pub fn with_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    #[must_use]
    pub fn with_counterparty(mut self, counterparty: &str) -> Self {
        self.counterparty = normalize_optional_text(Some(counterparty));
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = normalize_optional_text(Some(description));
        self
    }

    /// Amount with the sign implied by the operation: inflows positive,
    /// outflows negative.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        match self.operation {
            OperationType::Inflow => self.amount,
            OperationType::Outflow => -self.amount,
        }
    }

    /// Re-checks the invariants `new` enforces. Fields are public, so the
    /// builder runs this before accepting a movement.
    pub(crate) fn validate(&self) -> ResultLedger<()> {
        if self.amount.is_negative() {
            return Err(LedgerError::InvalidAmount(format!(
                "movement {}: amount must be >= 0, got {}",
                self.id, self.amount
            )));
        }
        if self.amount > Money::MAX_AMOUNT {
            return Err(LedgerError::InvalidAmount(format!(
                "movement {}: amount must be <= {}, got {}",
                self.id,
                Money::MAX_AMOUNT,
                self.amount
            )));
        }
        Ok(())
    }
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
