use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{info, Level};

use dow_prices::api::AlphaVantageClient;
use dow_prices::collector::ClosePriceCollector;
use dow_prices::export;
use dow_prices::models::Config;

/// Dow Jones Industrial Average constituents
const DOW_TICKERS: [&str; 30] = [
    "UNH", "GS", "MSFT", "HD", "V", "SHW", "MCD", "CAT", "AMGN", "AXP",
    "TRV", "CRM", "IBM", "JPM", "AAPL", "HON", "AMZN", "PG", "BA", "JNJ",
    "CVX", "MMM", "NVDA", "WMT", "DIS", "MRK", "KO", "CSCO", "NKE", "VZ",
];

// Requested window, end exclusive
const START_DATE: &str = "2025-01-01";
const END_DATE: &str = "2025-03-31";

const OUTPUT_FILE: &str = "dow_jones_close_prices_jan_mar_2025.csv";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    // Load configuration
    let config = Config::from_env()?;

    let start_date = NaiveDate::parse_from_str(START_DATE, "%Y-%m-%d")?;
    let end_date = NaiveDate::parse_from_str(END_DATE, "%Y-%m-%d")?;

    info!(
        "📈 Downloading daily closing prices for {} Dow Jones tickers from {} to {}",
        DOW_TICKERS.len(),
        start_date,
        end_date
    );

    let client = AlphaVantageClient::new(&config)?;
    let collector = ClosePriceCollector::new(client);

    let table = collector.collect(&DOW_TICKERS, start_date, end_date).await?;

    info!(
        "💾 Writing {} trading days for {} tickers to {}",
        table.row_count(),
        table.tickers().len(),
        OUTPUT_FILE
    );

    export::write_close_prices(&table, Path::new(OUTPUT_FILE))?;

    println!("Closing prices saved to '{}'", OUTPUT_FILE);

    Ok(())
}
