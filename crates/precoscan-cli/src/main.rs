//! Command line front end for the price-listing pipeline.
//!
//! The pipeline itself never prints or persists anything; this binary
//! decides when to invoke it and writes the outcome as JSON on stdout so
//! downstream tooling can consume it.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use precoscan_core::{gtin, ExtractionOutcome};
use precoscan_scraper::{fetch_price_listing, FetchOptions};

#[derive(Debug, Parser)]
#[command(name = "precoscan")]
#[command(about = "Fetch retail price listings for a GTIN barcode from the SEFAZ/RN NFC-e portal")]
struct Cli {
    /// GTIN barcode to look up.
    barcode: String,

    /// Seconds to wait for the portal page to finish rendering.
    #[arg(long, env = "PRECOSCAN_NAVIGATION_TIMEOUT_SECS", default_value_t = 30)]
    navigation_timeout_secs: u64,

    /// Optional bound, in seconds, on the whole invocation; on elapse the
    /// lookup is cancelled and reported as a failure.
    #[arg(long, env = "PRECOSCAN_DEADLINE_SECS")]
    deadline_secs: Option<u64>,

    /// User-Agent header presented to the portal.
    #[arg(long, env = "PRECOSCAN_USER_AGENT")]
    user_agent: Option<String>,

    /// Run the browser with a visible window (debugging aid).
    #[arg(long)]
    headed: bool,
}

/// Assembles pipeline options from the parsed arguments, falling back to
/// the library defaults for anything not overridden.
fn fetch_options(cli: &Cli) -> FetchOptions {
    let defaults = FetchOptions::default();
    FetchOptions {
        navigation_timeout: Duration::from_secs(cli.navigation_timeout_secs),
        deadline: cli.deadline_secs.map(Duration::from_secs),
        user_agent: cli.user_agent.clone().unwrap_or(defaults.user_agent),
        headless: !cli.headed,
        portal_base: defaults.portal_base,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Advisory only: the portal accepts any string, so a failed check
    // digit is worth a warning but not worth refusing the lookup.
    if !gtin::is_valid(&cli.barcode) {
        tracing::warn!(
            barcode = %cli.barcode,
            "barcode fails the GTIN check-digit test; looking it up anyway"
        );
    }

    let outcome = fetch_price_listing(&cli.barcode, &fetch_options(&cli)).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(match outcome {
        ExtractionOutcome::Failure { .. } => ExitCode::FAILURE,
        ExtractionOutcome::Success { .. } | ExtractionOutcome::EmptyResult => ExitCode::SUCCESS,
    })
}
