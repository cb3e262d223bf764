//! The module contains the errors the ledger can throw.
//!
//! Every error is raised at the input boundary (constructors, `TryFrom`
//! conversions and [`LedgerBuilder::build`]). Once a [`Ledger`] exists the
//! aggregation functions are infallible.
//!
//!  [`Ledger`]: crate::Ledger
//!  [`LedgerBuilder::build`]: crate::LedgerBuilder::build
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
}
