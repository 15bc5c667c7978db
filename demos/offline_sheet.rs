//! Generate a payment sheet without touching the network
//!
//! Usage: cargo run --example offline_sheet -- <ADDRESS> <AMOUNT> <RATE>

use xrpqr::{FiatCurrency, FixedRateSource, PaymentJob, PaymentSheetGenerator};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let address = args
        .next()
        .unwrap_or_else(|| "rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH".to_string());
    let amount: f64 = args.next().as_deref().unwrap_or("10").parse()?;
    let rate: f64 = args.next().as_deref().unwrap_or("0.55").parse()?;

    let generator = PaymentSheetGenerator::new(FixedRateSource::new(FiatCurrency::Eur, rate));
    let job = PaymentJob::new(address, amount)
        .with_pdf_path("offline_payment.pdf")
        .with_qr_path("offline_qr.png");

    let sheet = generator.generate(&job).await?;

    println!("✓ {}", sheet.payment.uri());
    println!("  QR:  {}", sheet.qr_path.display());
    println!("  PDF: {}", sheet.pdf_path.display());

    Ok(())
}
