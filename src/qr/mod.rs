//! QR code rendering for payment URIs

mod encoder;

pub use encoder::QrEncoder;
