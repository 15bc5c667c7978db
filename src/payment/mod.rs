//! Payment requests and their XRP conversion
//!
//! A [`PaymentRequest`] is validated once at construction. A
//! [`ComputedPayment`] can only be derived from a request together with a
//! successfully fetched [`ExchangeRate`], so a missing rate can never leak
//! into the amount.

mod currency;
mod uri;

pub use currency::FiatCurrency;
pub use uri::{PaymentUri, SCHEME, XRP_DECIMALS, format_xrp};

use crate::error::{Error, Result};
use crate::rate::ExchangeRate;
use serde::Serialize;
use std::ops::RangeInclusive;

/// Accepted length of a classic XRP address
pub const ADDRESS_LENGTH: RangeInclusive<usize> = 25..=35;

/// Smallest payable amount, one drop
pub const MIN_XRP_AMOUNT: f64 = 0.000_001;

/// Check that an address looks like a classic XRP account address.
pub fn validate_address(address: &str) -> Result<()> {
    let valid = address.starts_with('r')
        && ADDRESS_LENGTH.contains(&address.len())
        && address.chars().all(|c| c.is_ascii_alphanumeric());

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidAddress(address.to_string()))
    }
}

/// A validated request to be paid in XRP
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    address: String,
    fiat_amount: f64,
    currency: FiatCurrency,
}

impl PaymentRequest {
    /// Validate caller input and build the request.
    pub fn new(
        address: impl Into<String>,
        fiat_amount: f64,
        currency: FiatCurrency,
    ) -> Result<Self> {
        let address = address.into();
        validate_address(&address)?;

        if !fiat_amount.is_finite() || fiat_amount <= 0.0 {
            return Err(Error::InvalidAmount(fiat_amount));
        }

        Ok(Self {
            address,
            fiat_amount,
            currency,
        })
    }

    /// Destination wallet address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Amount in fiat
    pub fn fiat_amount(&self) -> f64 {
        self.fiat_amount
    }

    /// Fiat currency of the amount
    pub fn currency(&self) -> FiatCurrency {
        self.currency
    }
}

/// XRP amount and URI derived from a request and a live rate
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedPayment {
    xrp_amount: f64,
    rate: ExchangeRate,
    uri: PaymentUri,
}

impl ComputedPayment {
    /// Convert the request's fiat amount at `rate`.
    ///
    /// Fails when the rate is quoted in a different currency than the request,
    /// or when the quotient is not a finite amount of at least one drop.
    pub fn compute(request: &PaymentRequest, rate: ExchangeRate) -> Result<Self> {
        if rate.currency() != request.currency() {
            return Err(Error::Other(format!(
                "Rate quoted in {} but request is in {}",
                rate.currency(),
                request.currency()
            )));
        }

        let xrp_amount = request.fiat_amount() / rate.value();
        if !xrp_amount.is_finite() || xrp_amount < MIN_XRP_AMOUNT {
            return Err(Error::ConversionOutOfRange {
                fiat: request.fiat_amount(),
                rate: rate.value(),
                xrp: xrp_amount,
            });
        }

        let uri = PaymentUri::new(request.address(), xrp_amount);

        Ok(Self {
            xrp_amount,
            rate,
            uri,
        })
    }

    /// Unrounded XRP amount
    pub fn xrp_amount(&self) -> f64 {
        self.xrp_amount
    }

    /// XRP amount as shown to the payer
    pub fn xrp_display(&self) -> String {
        format_xrp(self.xrp_amount)
    }

    /// Rate used for the conversion
    pub fn rate(&self) -> ExchangeRate {
        self.rate
    }

    /// Wallet URI
    pub fn uri(&self) -> &PaymentUri {
        &self.uri
    }
}
