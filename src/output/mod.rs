//! Writing artifacts and rendering the run report

use crate::PaymentSheet;
use crate::error::{Error, Result};
use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write a file through a sibling temporary file renamed into place.
///
/// Either the complete content lands at `path` or `path` is left untouched.
/// An existing file at `path` is replaced.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| Error::asset_write(path, e))?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        write(&mut writer)?;
        writer.flush().map_err(|e| Error::asset_write(path, e))?;
    }
    staged
        .as_file()
        .sync_all()
        .map_err(|e| Error::asset_write(path, e))?;

    staged
        .persist(path)
        .map_err(|e| Error::asset_write(path, e.error))?;
    Ok(())
}

/// Combined structured and human-readable representation of a finished run
#[derive(Debug, Clone)]
pub struct RenderedSheet {
    /// Structured JSON representation suitable for scripts
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// Render a generated sheet into both JSON and human-readable forms.
pub fn render_sheet(sheet: &PaymentSheet) -> RenderedSheet {
    let currency = sheet.request.currency();
    let rate = sheet.payment.rate().value();

    let human = vec![
        format!("Generated URI: {}", sheet.payment.uri()),
        format!(
            "XRP Amount: {} XRP (based on 1 XRP ~ {:.4} {})",
            sheet.payment.xrp_display(),
            rate,
            currency
        ),
        format!("QR image saved: {}", sheet.qr_path.display()),
        format!("PDF saved: {}", sheet.pdf_path.display()),
    ];

    let json = json!({
        "address": sheet.request.address(),
        "fiat_amount": sheet.request.fiat_amount(),
        "currency": currency.code(),
        "rate": rate,
        "xrp_amount": sheet.payment.xrp_display(),
        "uri": sheet.payment.uri().to_string(),
        "qr_path": sheet.qr_path.display().to_string(),
        "pdf_path": sheet.pdf_path.display().to_string(),
    });

    RenderedSheet { json, human }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{ComputedPayment, FiatCurrency, PaymentRequest};
    use crate::rate::ExchangeRate;
    use std::path::PathBuf;

    fn sheet() -> PaymentSheet {
        let request =
            PaymentRequest::new("rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH", 10.0, FiatCurrency::Eur)
                .unwrap();
        let rate = ExchangeRate::new(FiatCurrency::Eur, 0.55).unwrap();
        let payment = ComputedPayment::compute(&request, rate).unwrap();

        PaymentSheet {
            request,
            payment,
            qr_path: PathBuf::from("qr_code.png"),
            pdf_path: PathBuf::from("xrp_qr_payment.pdf"),
        }
    }

    #[test]
    fn renders_sheet_consistently() {
        let rendered = render_sheet(&sheet());

        assert_eq!(
            rendered.human,
            vec![
                "Generated URI: xrpl:rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH?amount=18.181818",
                "XRP Amount: 18.181818 XRP (based on 1 XRP ~ 0.5500 EUR)",
                "QR image saved: qr_code.png",
                "PDF saved: xrp_qr_payment.pdf",
            ]
        );
        assert_eq!(rendered.json["xrp_amount"], "18.181818");
        assert_eq!(rendered.json["currency"], "EUR");
        assert_eq!(rendered.json["rate"], 0.55);
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old content that is longer").unwrap();

        write_atomically(&path, |w| Ok(w.write_all(b"new")?)).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let err = write_atomically(&path, |w| {
            w.write_all(b"partial")?;
            Err(Error::Document("boom".to_string()))
        })
        .unwrap_err();

        assert!(matches!(err, Error::Document(_)));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
