use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::{Config, DailyBar};

use super::{ApiRateLimiter, MarketDataProvider, ProviderError};

/// Alpha Vantage daily time-series response
#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Meta Data")]
    meta_data: DailyMetaData,
    #[serde(rename = "Time Series (Daily)")]
    time_series: HashMap<String, DailyEntry>,
}

#[derive(Debug, Deserialize)]
struct DailyMetaData {
    #[serde(rename = "2. Symbol")]
    symbol: String,
    #[serde(rename = "3. Last Refreshed")]
    last_refreshed: String,
}

#[derive(Debug, Deserialize)]
struct DailyEntry {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Alpha Vantage API client
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: ApiRateLimiter,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("dow-prices/0.1")
            .build()?;

        Ok(Self {
            client,
            api_key: config.alpha_vantage_api_key.clone(),
            base_url: config
                .alpha_vantage_base_url
                .trim_end_matches('/')
                .to_string(),
            rate_limiter: ApiRateLimiter::new(config.rate_limit_per_minute),
        })
    }

    /// Fetch the raw daily time series for a symbol
    async fn fetch_daily_series(&self, symbol: &str) -> Result<Value> {
        let url = format!(
            "{}/query?function=TIME_SERIES_DAILY&symbol={}&outputsize=full&apikey={}",
            self.base_url, symbol, self.api_key
        );

        self.rate_limiter.wait().await;

        debug!("Requesting daily series for {}", symbol);

        let response = self.client.get(&url).send().await
            .with_context(|| format!("daily series request for {} failed", symbol))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "daily series request for {} failed with status {}: {}",
                symbol,
                status,
                error_text
            ));
        }

        let json: Value = response.json().await
            .with_context(|| format!("failed to read daily series body for {}", symbol))?;

        Ok(json)
    }
}

/// The API reports problems as keys inside an otherwise successful body
fn check_soft_errors(symbol: &str, body: &Value) -> Result<(), ProviderError> {
    if let Some(message) = body.get("Error Message").and_then(Value::as_str) {
        return Err(ProviderError::ErrorMessage {
            symbol: symbol.to_string(),
            message: message.to_string(),
        });
    }

    // "Note" and "Information" both signal throttling on the free tier
    for key in ["Note", "Information"] {
        if let Some(message) = body.get(key).and_then(Value::as_str) {
            return Err(ProviderError::RateLimited {
                symbol: symbol.to_string(),
                message: message.to_string(),
            });
        }
    }

    Ok(())
}

/// Convert the string-encoded time series to daily bars,
/// keeping only dates within `[from, to)`
fn convert_time_series(
    symbol: &str,
    response: &DailyResponse,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyBar>> {
    let mut bars = Vec::new();

    for (date_str, entry) in &response.time_series {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .with_context(|| format!("failed to parse date '{}' for {}", date_str, symbol))?;

        if date < from || date >= to {
            continue;
        }

        bars.push(DailyBar {
            date,
            open: parse_price(&entry.open, "open", symbol)?,
            high: parse_price(&entry.high, "high", symbol)?,
            low: parse_price(&entry.low, "low", symbol)?,
            close: parse_price(&entry.close, "close", symbol)?,
            volume: entry.volume.parse::<i64>().with_context(|| {
                format!("failed to parse volume '{}' for {}", entry.volume, symbol)
            })?,
        });
    }

    // Sort by date (oldest first)
    bars.sort_by_key(|bar| bar.date);

    Ok(bars)
}

fn parse_price(raw: &str, field: &str, symbol: &str) -> Result<f64> {
    raw.parse::<f64>()
        .with_context(|| format!("failed to parse {} price '{}' for {}", field, raw, symbol))
}

#[async_trait::async_trait]
impl MarketDataProvider for AlphaVantageClient {
    async fn get_daily_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBar>> {
        let json = self.fetch_daily_series(symbol).await?;

        check_soft_errors(symbol, &json)?;

        if json.get("Time Series (Daily)").is_none() {
            return Err(ProviderError::MissingTimeSeries {
                symbol: symbol.to_string(),
            }
            .into());
        }

        let response: DailyResponse = serde_json::from_value(json)
            .with_context(|| format!("failed to parse daily series for {}", symbol))?;

        debug!(
            "Daily series for {} last refreshed {}",
            response.meta_data.symbol, response.meta_data.last_refreshed
        );

        let bars = convert_time_series(symbol, &response, from, to)?;

        debug!(
            "Retrieved {} daily bars for {} from {} to {}",
            bars.len(),
            symbol,
            from,
            to
        );

        Ok(bars)
    }
}
