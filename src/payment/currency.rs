//! Supported fiat currencies

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fiat currency a payment request can be denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FiatCurrency {
    /// Euro
    #[default]
    Eur,
    /// US dollar
    Usd,
}

impl FiatCurrency {
    /// Upper-case ISO code used on the page ("EUR").
    pub fn code(&self) -> &'static str {
        match self {
            FiatCurrency::Eur => "EUR",
            FiatCurrency::Usd => "USD",
        }
    }

    /// Lower-case code understood by the price feed ("eur").
    pub fn feed_code(&self) -> &'static str {
        match self {
            FiatCurrency::Eur => "eur",
            FiatCurrency::Usd => "usd",
        }
    }

    /// All supported currencies
    pub fn all() -> &'static [FiatCurrency] {
        &[FiatCurrency::Eur, FiatCurrency::Usd]
    }
}

impl fmt::Display for FiatCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FiatCurrency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(FiatCurrency::Eur),
            "USD" => Ok(FiatCurrency::Usd),
            _ => Err(Error::UnsupportedCurrency(s.to_string())),
        }
    }
}
