use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

/// One day of provider price data for a single ticker
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Closing prices keyed by trading date (rows) and ticker (columns).
///
/// The column set is fixed at construction and keeps the requested ticker
/// order; rows stay sorted by date. Cells without data remain `None`.
#[derive(Debug, Clone)]
pub struct PriceTable {
    tickers: Vec<String>,
    columns: HashMap<String, usize>,
    rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

impl PriceTable {
    pub fn new<S: AsRef<str>>(tickers: &[S]) -> Self {
        let tickers: Vec<String> = tickers.iter().map(|t| t.as_ref().to_string()).collect();
        let columns = tickers
            .iter()
            .enumerate()
            .map(|(index, ticker)| (ticker.clone(), index))
            .collect();

        Self {
            tickers,
            columns,
            rows: BTreeMap::new(),
        }
    }

    /// Record the closing price for one (date, ticker) cell.
    /// Tickers outside the requested set are ignored.
    pub fn insert_close(&mut self, ticker: &str, date: NaiveDate, close: f64) {
        if let Some(&column) = self.columns.get(ticker) {
            let width = self.tickers.len();
            let row = self.rows.entry(date).or_insert_with(|| vec![None; width]);
            row[column] = Some(close);
        }
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Rows in ascending date order
    pub fn rows(&self) -> impl Iterator<Item = (&NaiveDate, &[Option<f64>])> {
        self.rows.iter().map(|(date, closes)| (date, closes.as_slice()))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn close(&self, ticker: &str, date: NaiveDate) -> Option<f64> {
        let column = *self.columns.get(ticker)?;
        self.rows.get(&date)?.get(column).copied().flatten()
    }
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub alpha_vantage_api_key: String,
    pub alpha_vantage_base_url: String,
    pub rate_limit_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            alpha_vantage_api_key: std::env::var("ALPHA_VANTAGE_API_KEY")
                .map_err(|_| anyhow::anyhow!("ALPHA_VANTAGE_API_KEY environment variable required"))?,
            alpha_vantage_base_url: std::env::var("ALPHA_VANTAGE_BASE_URL")
                .unwrap_or_else(|_| "https://www.alphavantage.co".to_string()),
            // Alpha Vantage free tier allows 5 requests per minute
            rate_limit_per_minute: std::env::var("RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_columns_keep_requested_order() {
        let table = PriceTable::new(&["MSFT", "AAPL", "V"]);
        assert_eq!(table.tickers(), &["MSFT", "AAPL", "V"]);
    }

    #[test]
    fn test_rows_sorted_by_date() {
        let mut table = PriceTable::new(&["AAPL"]);
        table.insert_close("AAPL", date(2025, 1, 3), 187.5);
        table.insert_close("AAPL", date(2025, 1, 2), 185.0);

        let dates: Vec<NaiveDate> = table.rows().map(|(d, _)| *d).collect();
        assert_eq!(dates, vec![date(2025, 1, 2), date(2025, 1, 3)]);
    }

    #[test]
    fn test_missing_cells_stay_none() {
        let mut table = PriceTable::new(&["AAPL", "MSFT"]);
        table.insert_close("AAPL", date(2025, 1, 2), 185.0);

        assert_eq!(table.close("AAPL", date(2025, 1, 2)), Some(185.0));
        assert_eq!(table.close("MSFT", date(2025, 1, 2)), None);
    }

    #[test]
    fn test_unknown_ticker_ignored() {
        let mut table = PriceTable::new(&["AAPL"]);
        table.insert_close("TSLA", date(2025, 1, 2), 400.0);

        assert!(table.is_empty());
    }

    #[test]
    fn test_projection_keeps_exact_value() {
        let mut table = PriceTable::new(&["AAPL"]);
        table.insert_close("AAPL", date(2025, 1, 2), 185.6437);

        assert_eq!(table.close("AAPL", date(2025, 1, 2)), Some(185.6437));
    }
}
