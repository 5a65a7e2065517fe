use anyhow::Result;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::api::MarketDataProvider;
use crate::models::PriceTable;

/// Sequential fetch loop that projects daily closing prices into a table
pub struct ClosePriceCollector<P> {
    provider: P,
}

impl<P: MarketDataProvider> ClosePriceCollector<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Fetch every ticker in order and keep only the closing price.
    ///
    /// The table always carries one column per requested ticker; a ticker
    /// the provider returns no rows for keeps an all-empty column. Any
    /// retrieval failure aborts the whole run.
    pub async fn collect(
        &self,
        tickers: &[&str],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceTable> {
        let mut table = PriceTable::new(tickers);

        for ticker in tickers {
            info!("📊 Fetching data for {}...", ticker);

            let bars = self.provider.get_daily_history(ticker, from, to).await?;

            if bars.is_empty() {
                warn!("No daily bars returned for {} between {} and {}", ticker, from, to);
                continue;
            }

            info!("✅ Received {} daily bars for {}", bars.len(), ticker);

            for bar in bars {
                table.insert_close(ticker, bar.date, bar.close);
            }
        }

        Ok(table)
    }
}
