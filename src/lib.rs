//! xrpqr - printable XRP payment requests
//!
//! Converts a fiat amount into XRP at the live rate, encodes an XRPL payment
//! URI as a QR code and places it on a single-page PDF.
//!
//! The three stages run strictly in order: the rate is fetched, the payment
//! and its QR image are produced, then the sheet is composed. The first
//! failing stage stops the run and nothing after it is written.
//!
//! # Example
//!
//! ```no_run
//! use xrpqr::{CoinGeckoClient, FiatCurrency, PaymentJob, PaymentSheetGenerator, XrpqrConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> xrpqr::Result<()> {
//!     let config = XrpqrConfig::default();
//!     let rates = CoinGeckoClient::new(&config.price_feed)?;
//!     let generator = PaymentSheetGenerator::from_config(rates, &config);
//!
//!     let job = PaymentJob::new("rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH", 10.0)
//!         .with_currency(FiatCurrency::Usd);
//!     let sheet = generator.generate(&job).await?;
//!
//!     println!("{}", sheet.payment.uri());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod output;
pub mod payment;
pub mod qr;
pub mod rate;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{
    EccLevel, LogRotation, LoggingOptions, OutputOptions, PriceFeedOptions, QrOptions, XrpqrConfig,
};
pub use document::{DocumentComposer, PageLayout, PageSize};
pub use payment::{ComputedPayment, FiatCurrency, PaymentRequest, PaymentUri};
pub use qr::QrEncoder;
pub use rate::{CoinGeckoClient, ExchangeRate, FixedRateSource, RateSource, RateUnavailable};

use std::path::PathBuf;
use tracing::info;

/// Caller input for one payment sheet
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentJob {
    /// Destination wallet address
    pub address: String,
    /// Amount in fiat
    pub fiat_amount: f64,
    /// Fiat currency of the amount
    pub currency: FiatCurrency,
    /// Where the PDF is written
    pub pdf_path: PathBuf,
    /// Where the QR image is written
    pub qr_path: PathBuf,
}

impl PaymentJob {
    /// Job with the default currency (EUR) and default output paths.
    pub fn new(address: impl Into<String>, fiat_amount: f64) -> Self {
        Self::with_output(address, fiat_amount, &OutputOptions::default())
    }

    /// Job taking currency and paths from configured output defaults.
    pub fn with_output(
        address: impl Into<String>,
        fiat_amount: f64,
        output: &OutputOptions,
    ) -> Self {
        Self {
            address: address.into(),
            fiat_amount,
            currency: output.currency,
            pdf_path: output.pdf_path.clone(),
            qr_path: output.qr_path.clone(),
        }
    }

    /// Override the currency.
    pub fn with_currency(mut self, currency: FiatCurrency) -> Self {
        self.currency = currency;
        self
    }

    /// Override the PDF path.
    pub fn with_pdf_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdf_path = path.into();
        self
    }

    /// Override the QR image path.
    pub fn with_qr_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.qr_path = path.into();
        self
    }
}

/// Everything produced by a successful run
#[derive(Debug, Clone)]
pub struct PaymentSheet {
    /// Validated request
    pub request: PaymentRequest,
    /// Converted amount, rate and URI
    pub payment: ComputedPayment,
    /// QR image written
    pub qr_path: PathBuf,
    /// PDF written
    pub pdf_path: PathBuf,
}

/// Runs the fetch, encode and compose stages for a job
pub struct PaymentSheetGenerator<S> {
    rates: S,
    encoder: QrEncoder,
    composer: DocumentComposer,
}

impl<S: RateSource> PaymentSheetGenerator<S> {
    /// Generator with default QR and page settings.
    pub fn new(rates: S) -> Self {
        Self {
            rates,
            encoder: QrEncoder::default(),
            composer: DocumentComposer::default(),
        }
    }

    /// Generator using the QR and layout sections of `config`.
    pub fn from_config(rates: S, config: &XrpqrConfig) -> Self {
        Self {
            rates,
            encoder: QrEncoder::from_options(&config.qr),
            composer: DocumentComposer::new(config.layout.clone()),
        }
    }

    /// The price source in use
    pub fn rate_source(&self) -> &S {
        &self.rates
    }

    /// Produce the QR image and the PDF for `job`.
    ///
    /// Input and page layout are validated before the price feed is
    /// contacted. A missing rate stops the run before any file is written.
    pub async fn generate(&self, job: &PaymentJob) -> Result<PaymentSheet> {
        let request = PaymentRequest::new(job.address.as_str(), job.fiat_amount, job.currency)?;
        self.composer.layout().validate().map_err(Error::Config)?;

        let rate = self.rates.fetch_rate(request.currency()).await?;
        let payment = ComputedPayment::compute(&request, rate)?;

        info!(uri = %payment.uri(), "Generated URI");
        info!(
            xrp = %payment.xrp_display(),
            rate = %format!("{:.4}", rate.value()),
            currency = %request.currency(),
            "Converted fiat amount to XRP"
        );

        self.encoder.save(&payment.uri().to_string(), &job.qr_path)?;
        info!(path = %job.qr_path.display(), "QR image saved");

        self.composer.compose(&request, &payment, &job.qr_path, &job.pdf_path)?;
        info!(path = %job.pdf_path.display(), "PDF saved");

        Ok(PaymentSheet {
            request,
            payment,
            qr_path: job.qr_path.clone(),
            pdf_path: job.pdf_path.clone(),
        })
    }
}
