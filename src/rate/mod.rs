//! XRP exchange rates
//!
//! The price source sits behind the [`RateSource`] port so the live feed
//! can be swapped for a fixed or recording source in tests. A failed lookup
//! is a [`RateUnavailable`] value, never a zero or default price.

mod coingecko;

pub use coingecko::CoinGeckoClient;

use crate::payment::FiatCurrency;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Price of one XRP in a fiat currency, valid for the moment it was fetched
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExchangeRate {
    currency: FiatCurrency,
    value: f64,
}

impl ExchangeRate {
    /// Wrap a quoted price. Returns `None` unless the price is finite and positive.
    pub fn new(currency: FiatCurrency, value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self { currency, value })
    }

    /// Currency the price is quoted in
    pub fn currency(&self) -> FiatCurrency {
        self.currency
    }

    /// Fiat per one XRP
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// The price feed could not provide a usable rate
#[derive(Debug, Clone, Error)]
#[error("Could not fetch XRP price in {currency}: {reason}")]
pub struct RateUnavailable {
    /// Currency that was requested
    pub currency: FiatCurrency,
    /// Underlying cause, kept for operators
    pub reason: String,
}

impl RateUnavailable {
    /// Build the signal for `currency` with a human-readable cause.
    pub fn new(currency: FiatCurrency, reason: impl Into<String>) -> Self {
        Self {
            currency,
            reason: reason.into(),
        }
    }
}

/// Port for anything able to quote XRP in fiat.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch the current price of one XRP in `currency`.
    async fn fetch_rate(&self, currency: FiatCurrency) -> Result<ExchangeRate, RateUnavailable>;
}

/// Source that always answers with the same prices. Useful offline.
#[derive(Debug, Clone, Default)]
pub struct FixedRateSource {
    eur: Option<f64>,
    usd: Option<f64>,
}

impl FixedRateSource {
    /// Quote `value` for `currency`; other currencies stay unavailable.
    pub fn new(currency: FiatCurrency, value: f64) -> Self {
        Self::default().with_rate(currency, value)
    }

    /// Add or replace the quote for `currency`.
    pub fn with_rate(mut self, currency: FiatCurrency, value: f64) -> Self {
        match currency {
            FiatCurrency::Eur => self.eur = Some(value),
            FiatCurrency::Usd => self.usd = Some(value),
        }
        self
    }
}

#[async_trait]
impl RateSource for FixedRateSource {
    async fn fetch_rate(&self, currency: FiatCurrency) -> Result<ExchangeRate, RateUnavailable> {
        let quoted = match currency {
            FiatCurrency::Eur => self.eur,
            FiatCurrency::Usd => self.usd,
        };

        quoted
            .and_then(|value| ExchangeRate::new(currency, value))
            .ok_or_else(|| RateUnavailable::new(currency, "no usable fixed rate configured"))
    }
}
