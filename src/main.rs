//! xrpqr command-line entrypoint

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use xrpqr::output::render_sheet;
use xrpqr::{
    CoinGeckoClient, Error, FiatCurrency, PageSize, PaymentJob, PaymentSheetGenerator, Result,
    XrpqrConfig, logging,
};

#[derive(Parser, Debug)]
#[command(
    name = "xrpqr",
    version,
    about = "Generate a printable XRP payment QR code at the live exchange rate"
)]
struct Cli {
    /// Destination XRP address (starts with 'r', 25-35 characters)
    #[arg(long, short = 'a', value_name = "ADDRESS")]
    address: String,

    /// Amount to request, in fiat
    #[arg(long, short = 'm', value_name = "AMOUNT", allow_negative_numbers = true)]
    amount: f64,

    /// Fiat currency of the amount (EUR or USD)
    #[arg(long, short = 'c', value_name = "CODE")]
    currency: Option<FiatCurrency>,

    /// Output PDF path [default: xrp_qr_payment.pdf]
    #[arg(long, value_name = "PATH")]
    output_pdf: Option<PathBuf>,

    /// Output QR image path [default: qr_code.png]
    #[arg(long, value_name = "PATH")]
    output_qr: Option<PathBuf>,

    /// Page format of the PDF (letter, legal or a4)
    #[arg(long, value_name = "SIZE")]
    page_size: Option<String>,

    /// Optional configuration file (toml/yaml). Defaults to xrpqr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the result as JSON instead of human-readable lines
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = XrpqrConfig::load(cli.config.as_deref())?;

    if let Some(currency) = cli.currency {
        config.output.currency = currency;
    }
    if let Some(path) = cli.output_pdf {
        config.output.pdf_path = path;
    }
    if let Some(path) = cli.output_qr {
        config.output.qr_path = path;
    }
    if let Some(ref size) = cli.page_size {
        config.layout.page_size = size.parse::<PageSize>().map_err(Error::Config)?;
    }

    logging::init(&config.logging)?;
    match &config.source {
        Some(path) => info!("Using configuration file: {}", path.display()),
        None => debug!("No xrpqr.toml / xrpqr.yaml found, using defaults"),
    }
    info!(
        feed = %config.price_feed.base_url,
        page = ?config.layout.page_size,
        "Starting xrpqr"
    );

    let job = PaymentJob::with_output(cli.address, cli.amount, &config.output);
    let rates = CoinGeckoClient::new(&config.price_feed)?;
    let generator = PaymentSheetGenerator::from_config(rates, &config);

    let sheet = generator.generate(&job).await?;
    let rendered = render_sheet(&sheet);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rendered.json)?);
    } else {
        for line in &rendered.human {
            println!("{line}");
        }
    }

    Ok(())
}
