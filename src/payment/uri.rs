//! XRPL payment URI (`xrpl:<address>?amount=<xrp>`)

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// URI scheme understood by XRPL wallets
pub const SCHEME: &str = "xrpl";

/// Decimal places used for XRP amounts on the page and in the URI
pub const XRP_DECIMALS: usize = 6;

/// Format an XRP amount the way it appears in the URI.
pub fn format_xrp(amount: f64) -> String {
    format!("{:.*}", XRP_DECIMALS, amount)
}

/// A wallet payment URI
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentUri {
    address: String,
    amount: f64,
}

impl PaymentUri {
    /// Build a URI for the given address and XRP amount.
    pub fn new(address: impl Into<String>, amount: f64) -> Self {
        Self {
            address: address.into(),
            amount,
        }
    }

    /// Destination wallet address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// XRP amount carried by the URI
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

impl fmt::Display for PaymentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SCHEME}:{}?amount={}",
            self.address,
            format_xrp(self.amount)
        )
    }
}

impl FromStr for PaymentUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix(SCHEME)
            .and_then(|r| r.strip_prefix(':'))
            .ok_or_else(|| Error::Other(format!("Not an {SCHEME} URI: {s}")))?;

        let (address, query) = rest
            .split_once('?')
            .ok_or_else(|| Error::Other(format!("Missing amount in URI: {s}")))?;

        let amount = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("amount="))
            .ok_or_else(|| Error::Other(format!("Missing amount in URI: {s}")))?
            .parse::<f64>()
            .map_err(|e| Error::Other(format!("Invalid amount in URI {s}: {e}")))?;

        if address.is_empty() {
            return Err(Error::Other(format!("Missing address in URI: {s}")));
        }

        Ok(Self::new(address, amount))
    }
}
