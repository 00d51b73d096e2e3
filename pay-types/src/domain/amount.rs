//! Exact decimal monetary value with embedded currency.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// ISO-4217 alphabetic currency code, normalised to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses a three-letter currency code.
    pub fn new(code: &str) -> Result<Self, DomainError> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidCurrency(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monetary amount: a currency plus an exact decimal value.
///
/// The value keeps the scale it was created with (`10.50` stays `10.50`),
/// so it can be written to the gateway without rounding or reformatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    currency: CurrencyCode,
    value: Decimal,
}

impl Amount {
    /// Creates a new Amount.
    pub fn new(currency: CurrencyCode, value: Decimal) -> Result<Self, DomainError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self { currency, value })
    }

    /// Parses an amount from a currency code and a decimal literal such as `"10.25"`.
    pub fn parse(currency: &str, value: &str) -> Result<Self, DomainError> {
        let value: Decimal = value
            .trim()
            .parse()
            .map_err(|_| DomainError::ValidationError(format!("Invalid amount: {value}")))?;
        Self::new(CurrencyCode::new(currency)?, value)
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    /// True when the value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Returns a copy of this amount with a different value in the same currency.
    pub fn with_value(&self, value: Decimal) -> Result<Self, DomainError> {
        Self::new(self.currency.clone(), value)
    }

    /// Fails unless `other` is in the same currency.
    pub fn ensure_same_currency(&self, other: &Amount) -> Result<(), DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch {
                expected: self.currency.clone(),
                got: other.currency.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}
