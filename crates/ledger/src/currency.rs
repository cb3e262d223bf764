use serde::{Deserialize, Serialize};

use crate::{LedgerError, Money};

/// ISO currency code of a movement.
///
/// The set is closed: the treasury books in Peruvian soles and US dollars.
/// Both use 2 minor units, so every amount is an integer number of cents (see
/// [`Money`]).
///
/// The variant order is the lexical order of the codes, which is the order
/// used for ties in every report table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Pen,
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Pen, Currency::Usd];

    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Pen => "PEN",
            Currency::Usd => "USD",
        }
    }

    /// Symbol used in console summaries.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Pen => "S/",
            Currency::Usd => "$",
        }
    }

    /// Formats `amount` with the currency symbol and thousands separators.
    ///
    /// ```rust
    /// use ledger::{Currency, Money};
    ///
    /// assert_eq!(Currency::Pen.format(Money::new(-434_843_577)), "S/ -4,348,435.77");
    /// assert_eq!(Currency::Usd.format(Money::new(5)), "$ 0.05");
    /// ```
    #[must_use]
    pub fn format(self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let abs = amount.cents().unsigned_abs();
        let digits = (abs / 100).to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        format!("{} {sign}{grouped}.{:02}", self.symbol(), abs % 100)
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PEN" => Ok(Currency::Pen),
            "USD" => Ok(Currency::Usd),
            other => Err(LedgerError::InvalidCurrency(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
