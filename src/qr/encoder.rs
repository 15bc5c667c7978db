//! QR code encoder

use crate::config::QrOptions;
use crate::error::{Error, Result};
use crate::output::write_atomically;
use image::{DynamicImage, GrayImage, ImageFormat, Luma, imageops};
use qrcode::QrCode;
use std::path::Path;

const WHITE: Luma<u8> = Luma([255]);

/// Renders payment URIs as black-on-white QR rasters
#[derive(Debug, Clone)]
pub struct QrEncoder {
    ecc_level: qrcode::EcLevel,
    module_size: u32,
    border: u32,
}

impl QrEncoder {
    /// Create an encoder with medium error correction, 10 px modules and a
    /// 5 module border.
    pub fn new() -> Self {
        Self::from_options(&QrOptions::default())
    }

    /// Create an encoder from configuration.
    pub fn from_options(options: &QrOptions) -> Self {
        Self {
            ecc_level: options.ecc.into(),
            module_size: options.module_size.max(1),
            border: options.border,
        }
    }

    /// Encode text into a QR code image. The symbol version grows with the payload.
    pub fn encode_string(&self, data: &str) -> Result<DynamicImage> {
        let code = QrCode::with_error_correction_level(data.as_bytes(), self.ecc_level)
            .map_err(|e| Error::QrEncode(format!("Failed to create QR code: {}", e)))?;

        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(self.module_size, self.module_size)
            .build();

        tracing::debug!(
            version = ?code.version(),
            modules = code.width(),
            pixels = symbol.width(),
            "Encoded QR symbol"
        );

        Ok(DynamicImage::ImageLuma8(self.with_border(&symbol)))
    }

    /// Encode `data` and write the image to `path`.
    ///
    /// The format follows the file extension and falls back to PNG.
    pub fn save(&self, data: &str, path: &Path) -> Result<DynamicImage> {
        let image = self.encode_string(data)?;
        let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);

        write_atomically(path, |file| {
            image
                .write_to(file, format)
                .map_err(|e| Error::Image(format!("Failed to encode {}: {e}", path.display())))
        })?;

        Ok(image)
    }

    fn with_border(&self, symbol: &GrayImage) -> GrayImage {
        let margin = self.border * self.module_size;
        let mut canvas = GrayImage::from_pixel(
            symbol.width() + 2 * margin,
            symbol.height() + 2 * margin,
            WHITE,
        );
        imageops::replace(&mut canvas, symbol, i64::from(margin), i64::from(margin));
        canvas
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}
