use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::DailyBar;

pub mod alpha_vantage_client;
pub use alpha_vantage_client::AlphaVantageClient;

/// Errors the provider reports inside an HTTP 200 body
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider rejected request for {symbol}: {message}")]
    ErrorMessage { symbol: String, message: String },
    #[error("provider throttled request for {symbol}: {message}")]
    RateLimited { symbol: String, message: String },
    #[error("no daily time series in response for {symbol}")]
    MissingTimeSeries { symbol: String },
}

/// Simple rate limiter for API requests
pub struct ApiRateLimiter {
    delay_ms: u64,
}

impl ApiRateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let delay_ms = if requests_per_minute > 0 {
            60_000 / requests_per_minute as u64
        } else {
            1000 // Default 1 second delay
        };

        Self { delay_ms }
    }

    pub async fn wait(&self) {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
    }
}

/// Common trait for market data providers
#[async_trait::async_trait]
pub trait MarketDataProvider {
    /// Daily bars for `symbol` within `[from, to)` (end exclusive),
    /// sorted ascending by date.
    async fn get_daily_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBar>>;
}
