//! Country record types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO 4217 currency codes known to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    GBP,
    EUR,
    PLN,
}

impl Currency {
    /// The code as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::GBP => "GBP",
            Currency::EUR => "EUR",
            Currency::PLN => "PLN",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a currency code is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown currency code '{0}'")]
pub struct ParseCurrencyError(pub String);

impl FromStr for Currency {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GBP" => Ok(Currency::GBP),
            "EUR" => Ok(Currency::EUR),
            "PLN" => Ok(Currency::PLN),
            other => Err(ParseCurrencyError(other.to_string())),
        }
    }
}

/// A single country record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub capital: String,
    pub currency: Currency,
    pub population: u64,
}

impl Country {
    pub fn new(name: &str, capital: &str, currency: Currency, population: u64) -> Self {
        Self {
            name: name.to_string(),
            capital: capital.to_string(),
            currency,
            population,
        }
    }
}
