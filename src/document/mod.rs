//! Single-page payment sheet
//!
//! The sheet is laid out at fixed positions described by [`PageLayout`]:
//! a bold title, three detail lines, the QR image centered under them and a
//! short scanning hint. Nothing reflows.

mod layout;

pub use layout::{PageLayout, PageSize};

use crate::error::{Error, Result};
use crate::output::write_atomically;
use crate::payment::{ComputedPayment, PaymentRequest};
use printpdf::image_crate;
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};
use std::path::Path;

/// Title printed at the top of the sheet
pub const TITLE: &str = "XRP Payment QR Code";

/// Hint printed under the QR image
pub const CAPTION: &str = "Scan with an XRP wallet (e.g., Xaman) to pay.";

/// Fiat amount as printed on the sheet; whole amounts keep one decimal.
pub fn format_fiat(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e16 {
        format!("{amount:.1}")
    } else {
        amount.to_string()
    }
}

/// Text lines of the sheet, top to bottom, without the caption
pub fn detail_lines(request: &PaymentRequest, payment: &ComputedPayment) -> [String; 3] {
    let currency = request.currency();
    [
        format!("Address: {}", request.address()),
        format!(
            "Amount: {} {} ({} XRP)",
            format_fiat(request.fiat_amount()),
            currency,
            payment.xrp_display()
        ),
        format!(
            "Current rate: 1 XRP ~ {:.4} {}",
            payment.rate().value(),
            currency
        ),
    ]
}

/// Lays out and writes payment sheets
#[derive(Debug, Clone, Default)]
pub struct DocumentComposer {
    layout: PageLayout,
}

impl DocumentComposer {
    /// Composer using the given page geometry.
    pub fn new(layout: PageLayout) -> Self {
        Self { layout }
    }

    /// Page geometry in use
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Compose the sheet around the QR image at `qr_path` and write it to `pdf_path`.
    ///
    /// An existing file at `pdf_path` is overwritten. If the layout does not
    /// fit the page or the QR image cannot be read, no PDF is written.
    pub fn compose(
        &self,
        request: &PaymentRequest,
        payment: &ComputedPayment,
        qr_path: &Path,
        pdf_path: &Path,
    ) -> Result<()> {
        self.layout.validate().map_err(Error::Config)?;
        let (qr, qr_pixels) = load_qr(qr_path)?;

        let layout = &self.layout;
        let (width, height) = layout.page_size.dimensions();
        let (doc, page, layer) = PdfDocument::new(TITLE, at(width), at(height), "Sheet");
        let canvas = doc.get_page(page).get_layer(layer);

        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        let x = at(layout.text_left);
        canvas.use_text(
            TITLE,
            layout.title_font_size,
            x,
            at(layout.y_from_top(layout.title_offset)),
            &bold,
        );

        let offsets = [
            layout.address_offset,
            layout.amount_offset,
            layout.rate_offset,
        ];
        for (line, offset) in detail_lines(request, payment).into_iter().zip(offsets) {
            canvas.use_text(
                line,
                layout.body_font_size,
                x,
                at(layout.y_from_top(offset)),
                &regular,
            );
        }

        // Pick the DPI that makes the raster exactly `qr_size` points wide.
        let dpi = qr_pixels as f32 * 72.0 / layout.qr_size;
        let (qr_x, qr_y) = layout.qr_origin();
        Image::from_dynamic_image(&qr).add_to_layer(
            canvas.clone(),
            ImageTransform {
                translate_x: Some(at(qr_x)),
                translate_y: Some(at(qr_y)),
                dpi: Some(dpi),
                ..ImageTransform::default()
            },
        );

        canvas.use_text(
            CAPTION,
            layout.caption_font_size,
            x,
            at(layout.caption_y()),
            &regular,
        );

        write_atomically(pdf_path, |writer| {
            doc.save(writer)?;
            Ok(())
        })?;

        tracing::debug!(
            pdf = %pdf_path.display(),
            page = ?layout.page_size,
            qr_pixels,
            "Composed payment sheet"
        );
        Ok(())
    }
}

/// Decode the QR file into the PDF writer's RGB image type, with its width in pixels.
fn load_qr(path: &Path) -> Result<(image_crate::DynamicImage, u32)> {
    let rgb = image::open(path)
        .map_err(|e| Error::Document(format!("Cannot read QR image {}: {e}", path.display())))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();

    image_crate::RgbImage::from_raw(width, height, rgb.into_raw())
        .map(|pixels| (image_crate::DynamicImage::ImageRgb8(pixels), width))
        .ok_or_else(|| Error::Document(format!("QR image {} has no pixels", path.display())))
}

/// Points to millimetres.
fn at(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::FiatCurrency;
    use crate::qr::QrEncoder;
    use crate::rate::ExchangeRate;

    fn payment() -> (PaymentRequest, ComputedPayment) {
        let request =
            PaymentRequest::new("rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH", 10.0, FiatCurrency::Eur)
                .unwrap();
        let rate = ExchangeRate::new(FiatCurrency::Eur, 0.55).unwrap();
        let payment = ComputedPayment::compute(&request, rate).unwrap();
        (request, payment)
    }

    #[test]
    fn detail_lines_match_sheet_text() {
        let (request, payment) = payment();
        assert_eq!(
            detail_lines(&request, &payment),
            [
                "Address: rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH".to_string(),
                "Amount: 10.0 EUR (18.181818 XRP)".to_string(),
                "Current rate: 1 XRP ~ 0.5500 EUR".to_string(),
            ]
        );
    }

    #[test]
    fn fiat_amount_keeps_a_decimal_when_whole() {
        assert_eq!(format_fiat(10.0), "10.0");
        assert_eq!(format_fiat(12.5), "12.5");
        assert_eq!(format_fiat(0.01), "0.01");
        assert_eq!(format_fiat(99.99), "99.99");
    }

    #[test]
    fn writes_pdf_for_every_page_size() {
        let dir = tempfile::tempdir().unwrap();
        let (request, payment) = payment();
        let qr_path = dir.path().join("qr.png");
        QrEncoder::new()
            .save(&payment.uri().to_string(), &qr_path)
            .unwrap();

        for size in [PageSize::Letter, PageSize::Legal, PageSize::A4] {
            let pdf_path = dir.path().join(format!("{size:?}.pdf"));
            let composer = DocumentComposer::new(PageLayout {
                page_size: size,
                ..PageLayout::default()
            });

            composer
                .compose(&request, &payment, &qr_path, &pdf_path)
                .unwrap();

            let bytes = std::fs::read(&pdf_path).unwrap();
            assert!(bytes.starts_with(b"%PDF-"));
        }
    }

    #[test]
    fn overwrites_existing_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let (request, payment) = payment();
        let qr_path = dir.path().join("qr.png");
        let pdf_path = dir.path().join("sheet.pdf");
        QrEncoder::new()
            .save(&payment.uri().to_string(), &qr_path)
            .unwrap();
        std::fs::write(&pdf_path, b"stale").unwrap();

        DocumentComposer::default()
            .compose(&request, &payment, &qr_path, &pdf_path)
            .unwrap();

        let bytes = std::fs::read(&pdf_path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn missing_qr_image_produces_no_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let (request, payment) = payment();
        let pdf_path = dir.path().join("sheet.pdf");

        let err = DocumentComposer::default()
            .compose(&request, &payment, &dir.path().join("absent.png"), &pdf_path)
            .unwrap_err();

        assert!(matches!(err, Error::Document(_)));
        assert!(!pdf_path.exists());
    }

    #[test]
    fn zero_sized_qr_produces_no_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let (request, payment) = payment();
        let qr_path = dir.path().join("qr.png");
        let pdf_path = dir.path().join("sheet.pdf");
        QrEncoder::new()
            .save(&payment.uri().to_string(), &qr_path)
            .unwrap();

        let composer = DocumentComposer::new(PageLayout {
            qr_size: 0.0,
            ..PageLayout::default()
        });
        let err = composer
            .compose(&request, &payment, &qr_path, &pdf_path)
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)), "{err}");
        assert!(!pdf_path.exists());
    }
}
