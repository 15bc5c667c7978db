//! Error types for payment sheet generation

use crate::rate::RateUnavailable;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using xrpqr's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xrpqr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Wallet address failed the format check
    #[error("Invalid XRP address '{0}': must start with 'r', be 25-35 characters long and alphanumeric")]
    InvalidAddress(String),

    /// Fiat amount is zero, negative or not a number
    #[error("Invalid amount {0}: must be a positive number")]
    InvalidAmount(f64),

    /// Fiat amount and rate give an XRP amount that cannot be requested
    #[error("Converting {fiat} at a rate of {rate} gives an unusable XRP amount ({xrp})")]
    ConversionOutOfRange {
        /// Requested fiat amount
        fiat: f64,
        /// Fiat price of one XRP
        rate: f64,
        /// Result of the division
        xrp: f64,
    },

    /// Currency code outside the supported set
    #[error("Unsupported currency '{0}', expected EUR or USD")]
    UnsupportedCurrency(String),

    /// The price feed could not provide a rate
    #[error(transparent)]
    RateUnavailable(#[from] RateUnavailable),

    /// An output artifact could not be written
    #[error("Failed to write {}: {source}", path.display())]
    AssetWrite {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// PDF composition error
    #[error("Document error: {0}")]
    Document(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an I/O failure on an output artifact.
    pub fn asset_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::AssetWrite {
            path: path.into(),
            source,
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<printpdf::Error> for Error {
    fn from(e: printpdf::Error) -> Self {
        Error::Document(format!("{e:?}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}
